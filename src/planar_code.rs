//! Reading and writing graphs in planar code
//!
//! A planar code starts with the number of vertices `n`, followed by
//! the clockwise neighbours of each vertex, counted from 1 and each
//! list terminated by 0. Codes for graphs with fewer than 255
//! vertices use one byte per entry. Larger graphs are announced by a
//! leading 0 byte and use two bytes per entry.
//!
//! A stream may start with a header such as `>>planar_code<<` or
//! `>>planar_code_old<<`, optionally specifying the byte order of
//! two-byte entries as in `>>planar_code be<<`.
use std::io::{BufRead, ErrorKind, Read, Write};

use log::debug;

use crate::error::PlanarError;
use crate::plane_graph::{DecodeOptions, PlaneGraph};

const HEADER: &[u8] = b">>planar_code<<";
const HEADER_NAME: &str = "planar_code";
const MAX_HEADER_LEN: usize = 64;

fn malformed(msg: impl Into<String>) -> PlanarError {
    PlanarError::MalformedCode(msg.into())
}

/// Iterator over the planar codes in a stream
///
/// Each item is a code with `code[0]` the number of vertices. After
/// the first error the iterator is exhausted.
///
/// # Example
///
/// ```rust
/// use planar_autom::planar_code::PlanarCodeReader;
///
/// // a triangle with and without header
/// let input = b">>planar_code<<\x03\x02\x03\x00\x01\x03\x00\x01\x02\x00";
/// let codes: Vec<_> = PlanarCodeReader::new(&input[..])
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(codes, [vec![3, 2, 3, 0, 1, 3, 0, 1, 2, 0]]);
/// ```
#[derive(Debug)]
pub struct PlanarCodeReader<R> {
    reader: R,
    big_endian: bool,
    done: bool,
}

impl<R: BufRead> PlanarCodeReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            big_endian: false,
            done: false,
        }
    }

    /// Whether two-byte entries are read as big endian
    pub fn is_big_endian(&self) -> bool {
        self.big_endian
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read the next code, `None` at the end of the stream
    pub fn read_code(&mut self) -> Result<Option<Vec<u16>>, PlanarError> {
        let Some(mut first) = self.read_u8()? else {
            return Ok(None);
        };
        let mut code = Vec::new();
        if first == b'>' {
            let (second, third) = (self.expect_u8()?, self.expect_u8()?);
            if (second, third) == (b'>', b'p') {
                self.read_header()?;
                match self.read_u8()? {
                    Some(next) => first = next,
                    None => return Ok(None),
                }
            } else {
                // a byte code for 62 vertices
                code.extend([first, second, third].map(u16::from));
            }
        }
        if first != 0 {
            if code.is_empty() {
                code.push(u16::from(first));
            }
            let nv = usize::from(first);
            let mut terminators = code[1..].iter().filter(|&&w| w == 0).count();
            while terminators < nv {
                let w = self.expect_u8()?;
                if w == 0 {
                    terminators += 1;
                }
                code.push(u16::from(w));
            }
        } else {
            let nv = self.expect_u16()?;
            code.push(nv);
            let mut terminators = 0;
            while terminators < nv {
                let w = self.expect_u16()?;
                if w == 0 {
                    terminators += 1;
                }
                code.push(w);
            }
        }
        Ok(Some(code))
    }

    // the leading ">>p" has already been consumed
    fn read_header(&mut self) -> Result<(), PlanarError> {
        let mut text = vec![b'p'];
        loop {
            let c = self.expect_u8()?;
            if c == b'<' {
                break;
            }
            if text.len() >= MAX_HEADER_LEN {
                return Err(malformed("unterminated header"));
            }
            text.push(c);
        }
        if self.expect_u8()? != b'<' {
            return Err(malformed("header closed by a single '<'"));
        }
        let text = String::from_utf8_lossy(&text);
        let Some(options) = text.strip_prefix(HEADER_NAME) else {
            return Err(malformed(format!("unsupported header >>{text}<<")));
        };
        // variants such as `_old` carry no options
        let mut byte_order = None;
        for token in options.split_whitespace() {
            match token {
                "le" => byte_order = Some(false),
                "be" => byte_order = Some(true),
                _ => debug!("Ignoring '{token}' in header"),
            }
        }
        self.big_endian = byte_order.unwrap_or(false);
        debug!("Read header >>{text}<<");
        Ok(())
    }

    fn read_u8(&mut self) -> Result<Option<u8>, PlanarError> {
        let mut buf = [0u8; 1];
        match self.reader.read_exact(&mut buf) {
            Ok(()) => Ok(Some(buf[0])),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn expect_u8(&mut self) -> Result<u8, PlanarError> {
        self.read_u8()?
            .ok_or_else(|| malformed("unexpected end of input"))
    }

    fn expect_u16(&mut self) -> Result<u16, PlanarError> {
        let mut buf = [0u8; 2];
        match self.reader.read_exact(&mut buf) {
            Ok(()) if self.big_endian => Ok(u16::from_be_bytes(buf)),
            Ok(()) => Ok(u16::from_le_bytes(buf)),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
                Err(malformed("unexpected end of input"))
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl<R: BufRead> Iterator for PlanarCodeReader<R> {
    type Item = Result<Vec<u16>, PlanarError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_code() {
            Ok(Some(code)) => Some(Ok(code)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl PlaneGraph {
    /// Replace the content of the graph by a decoded planar code
    ///
    /// On error the graph is left empty.
    pub fn load_planar_code(&mut self, code: &[u16]) -> Result<(), PlanarError> {
        let Some((&nv, body)) = code.split_first() else {
            self.clear();
            return Err(malformed("empty code"));
        };
        let nv = usize::from(nv);
        let terminators = body.iter().filter(|&&w| w == 0).count();
        if terminators != nv || body.last().is_some_and(|&w| w != 0) {
            self.clear();
            return Err(malformed(format!(
                "expected {nv} neighbour lists terminated by 0, found {terminators}"
            )));
        }
        let rotations = body
            .split(|&w| w == 0)
            .take(nv)
            .map(|neighbours| neighbours.iter().map(|&w| usize::from(w) - 1));
        self.load(nv, rotations)
    }

    /// Planar code of the graph
    pub fn to_planar_code(&self) -> Result<Vec<u16>, PlanarError> {
        let nv = self.vertex_count();
        if nv >= usize::from(u16::MAX) {
            return Err(PlanarError::CapacityExceeded {
                what: "vertices",
                found: nv,
                max: usize::from(u16::MAX) - 1,
            });
        }
        let mut code = Vec::with_capacity(1 + nv + self.arc_count());
        code.push(nv as u16);
        for v in 0..nv {
            code.extend(self.neighbours(v).map(|w| w as u16 + 1));
            code.push(0);
        }
        Ok(code)
    }
}

/// Decode a planar code into a new graph
///
/// The capacity of the graph and whether faces are computed is
/// determined by `options`.
pub fn decode_planar_code(
    code: &[u16],
    options: &DecodeOptions,
) -> Result<PlaneGraph, PlanarError> {
    let mut graph = PlaneGraph::with_options(options)?;
    graph.load_planar_code(code)?;
    if options.compute_dual {
        graph.make_dual();
    }
    Ok(graph)
}

/// Writes graphs as planar code
///
/// The header `>>planar_code<<` is written before the first graph.
/// Two-byte entries are little endian.
#[derive(Debug)]
pub struct PlanarCodeWriter<W> {
    writer: W,
    header_written: bool,
    buf: Vec<u8>,
}

impl<W: Write> PlanarCodeWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
            buf: Vec::new(),
        }
    }

    pub fn write_graph(&mut self, graph: &PlaneGraph) -> Result<(), PlanarError> {
        let code = graph.to_planar_code()?;
        self.write_code(&code)
    }

    /// Write a code as returned by [PlanarCodeReader]
    pub fn write_code(&mut self, code: &[u16]) -> Result<(), PlanarError> {
        let Some(&nv) = code.first() else {
            return Err(malformed("empty code"));
        };
        if let Some(&w) = code[1..].iter().find(|&&w| w > nv) {
            return Err(malformed(format!(
                "neighbour {w} in code for {nv} vertices"
            )));
        }
        self.buf.clear();
        if !self.header_written {
            self.buf.extend_from_slice(HEADER);
            self.header_written = true;
        }
        if nv < 255 {
            self.buf.extend(code.iter().map(|&w| w as u8));
        } else {
            self.buf.push(0);
            for w in code {
                self.buf.extend_from_slice(&w.to_le_bytes());
            }
        }
        self.writer.write_all(&self.buf)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), PlanarError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use log::debug;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn read_all(input: &[u8]) -> Vec<Result<Vec<u16>, PlanarError>> {
        PlanarCodeReader::new(input).collect()
    }

    fn write_all(rotations: &[Vec<Vec<usize>>]) -> Vec<u8> {
        let mut writer = PlanarCodeWriter::new(Vec::new());
        for rot in rotations {
            let g = PlaneGraph::from_rotation_system(rot).unwrap();
            writer.write_graph(&g).unwrap();
        }
        writer.into_inner()
    }

    #[test]
    fn tetrahedron_bytes() {
        log_init();

        let out = write_all(&[testing::tetrahedron()]);
        debug!("{out:?}");
        assert!(out.starts_with(HEADER));
        let body = &out[HEADER.len()..];
        assert_eq!(body[0], 4);
        assert_eq!(body.len(), 1 + 4 * 4);
        assert_eq!(body.iter().filter(|&&b| b == 0).count(), 4);
    }

    #[test]
    fn round_trip() {
        log_init();

        let graphs = vec![
            testing::cube(),
            testing::icosahedron(),
            testing::spider(&[2, 1, 3]),
            vec![vec![]],
            // two-byte entries
            testing::prism(130),
        ];
        let out = write_all(&graphs);
        let codes: Vec<_> = read_all(&out).into_iter().map(Result::unwrap).collect();
        assert_eq!(codes.len(), graphs.len());
        let options = DecodeOptions::default();
        for (code, rot) in codes.iter().zip(&graphs) {
            let g = decode_planar_code(code, &options).unwrap();
            assert!(g.has_dual());
            assert_eq!(&g.rotations(), rot);
            assert_eq!(&g.to_planar_code().unwrap(), code);
        }
    }

    #[test]
    fn headers() {
        log_init();

        // no header
        let triangle = [3, 2, 3, 0, 1, 3, 0, 1, 2, 0];
        let codes = read_all(&triangle);
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].as_ref().unwrap(), &triangle.map(u16::from));

        // internal headers of concatenated files are skipped
        let mut out = write_all(&[testing::cube()]);
        out.extend(write_all(&[testing::octahedron(), testing::tetrahedron()]));
        let codes = read_all(&out);
        assert_eq!(codes.len(), 3);
        assert!(codes.iter().all(Result::is_ok));

        // big endian
        let mut input = b">>planar_code be<<".to_vec();
        input.push(0);
        for w in triangle {
            input.extend_from_slice(&u16::from(w).to_be_bytes());
        }
        let mut reader = PlanarCodeReader::new(&input[..]);
        let code = reader.next().unwrap().unwrap();
        assert!(reader.is_big_endian());
        assert_eq!(code, triangle.map(u16::from));
        assert!(reader.next().is_none());

        // header variants
        for header in [
            &b">>planar_code_old<<"[..],
            &b">>planar_code le<<"[..],
            &b">>planar_code_old be<<"[..],
        ] {
            let mut input = header.to_vec();
            if header.ends_with(b"be<<") {
                input.push(0);
                for w in triangle {
                    input.extend_from_slice(&u16::from(w).to_be_bytes());
                }
            } else {
                input.extend_from_slice(&triangle);
            }
            let codes = read_all(&input);
            assert_eq!(codes.len(), 1);
            assert_eq!(codes[0].as_ref().unwrap(), &triangle.map(u16::from));
        }

        // header only
        assert!(read_all(HEADER).is_empty());
        assert!(read_all(b"").is_empty());
    }

    #[test]
    fn malformed_input() {
        log_init();

        let codes = read_all(b">>planar_cod le<<\x01\x00");
        assert_eq!(codes.len(), 1);
        assert!(matches!(codes[0], Err(PlanarError::MalformedCode(_))));

        // unknown header options are skipped
        let codes = read_all(b">>planar_code wrong<<\x01\x00");
        assert_eq!(codes[0].as_ref().unwrap(), &[1u16, 0]);

        // truncated after the first graph
        let codes = read_all(&[3, 2, 3, 0, 1, 3, 0, 1, 2, 0, 3, 2]);
        assert_eq!(codes.len(), 2);
        assert!(codes[0].is_ok());
        assert!(matches!(codes[1], Err(PlanarError::MalformedCode(_))));

        let mut g = PlaneGraph::new(10, 0).unwrap();
        assert!(matches!(
            g.load_planar_code(&[3, 2, 3, 0, 1, 3, 0]),
            Err(PlanarError::MalformedCode(_))
        ));
        assert!(matches!(
            g.load_planar_code(&[]),
            Err(PlanarError::MalformedCode(_))
        ));
        // missing inverse arc 3 -> 1
        assert!(matches!(
            g.load_planar_code(&[3, 2, 3, 0, 1, 3, 0, 2, 0]),
            Err(PlanarError::MalformedGraph(_))
        ));
        assert_eq!(g.vertex_count(), 0);
        let options = DecodeOptions {
            max_vertices: 3,
            ..Default::default()
        };
        assert!(matches!(
            decode_planar_code(&testing_code(&testing::tetrahedron()), &options),
            Err(PlanarError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn out_of_range() {
        log_init();

        let mut writer = PlanarCodeWriter::new(Vec::new());
        assert!(matches!(
            writer.write_code(&[2, 2, 0, 300, 0]),
            Err(PlanarError::MalformedCode(_))
        ));
        assert!(writer.get_ref().is_empty());
        writer.write_code(&[2, 2, 0, 1, 0]).unwrap();
        let out = writer.into_inner();
        assert_eq!(&out[HEADER.len()..], &[2u8, 2, 0, 1, 0]);
    }

    fn testing_code(rotations: &[Vec<usize>]) -> Vec<u16> {
        PlaneGraph::from_rotation_system(rotations)
            .unwrap()
            .to_planar_code()
            .unwrap()
    }
}
