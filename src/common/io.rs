//! Common, IO-related code.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use flate2::{bufread::MultiGzDecoder, write::GzEncoder, Compression};

/// Transparently open a file with gzip decoder.
pub fn open_read_maybe_gz<P>(path: P) -> Result<Box<dyn BufRead>, anyhow::Error>
where
    P: AsRef<Path>,
{
    if path.as_ref().extension().map(|s| s.to_str()) == Some(Some("gz")) {
        tracing::trace!("Opening {:?} as gzip for reading", path.as_ref());
        let file = File::open(path)?;
        let bufreader = BufReader::new(file);
        let decoder = MultiGzDecoder::new(bufreader);
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        tracing::trace!("Opening {:?} as plain text for reading", path.as_ref());
        let file = File::open(path).map(BufReader::new)?;
        Ok(Box::new(file))
    }
}

/// Transparently open a file with gzip encoder.
pub fn open_write_maybe_gz<P>(path: P) -> Result<Box<dyn Write>, anyhow::Error>
where
    P: AsRef<Path>,
{
    if path.as_ref().extension().map(|s| s.to_str()) == Some(Some("gz")) {
        tracing::trace!("Opening {:?} as gzip for writing", path.as_ref());
        let file = File::create(path)?;
        let bufwriter = BufWriter::new(file);
        let encoder = GzEncoder::new(bufwriter, Compression::default());
        Ok(Box::new(encoder))
    } else {
        tracing::trace!("Opening {:?} as plain text for writing", path.as_ref());
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// Parse a single-byte delimiter from the command line, e.g., `,` or `\t`.
pub fn parse_delimiter(sep: &str) -> Result<u8, anyhow::Error> {
    match sep {
        "\\t" | "tab" => Ok(b'\t'),
        _ if sep.len() == 1 => Ok(sep.as_bytes()[0]),
        _ => Err(anyhow::anyhow!(
            "delimiter must be a single character, got {:?}",
            sep
        )),
    }
}

#[cfg(test)]
mod test {
    use std::io::{Read, Write};

    #[rstest::rstest]
    #[case(true)]
    #[case(false)]
    fn write_then_read_maybe_gz(#[case] is_gzip: bool) -> Result<(), anyhow::Error> {
        let filename = if is_gzip { "test.txt.gz" } else { "test.txt" };
        let tmp_dir = temp_testdir::TempDir::default();

        {
            let mut f = super::open_write_maybe_gz(tmp_dir.join(filename))?;
            f.write_all(b"patient,rs1\nP1,2\n")?;
            f.flush()?;
        }

        let mut buf = String::new();
        super::open_read_maybe_gz(tmp_dir.join(filename))?.read_to_string(&mut buf)?;

        assert_eq!(buf, "patient,rs1\nP1,2\n");

        Ok(())
    }

    #[rstest::rstest]
    #[case(",", b',')]
    #[case("\\t", b'\t')]
    #[case("tab", b'\t')]
    #[case(";", b';')]
    fn parse_delimiter(#[case] sep: &str, #[case] expected: u8) -> Result<(), anyhow::Error> {
        assert_eq!(expected, super::parse_delimiter(sep)?);

        Ok(())
    }

    #[test]
    fn parse_delimiter_rejects_long() {
        assert!(super::parse_delimiter(",,").is_err());
    }
}
