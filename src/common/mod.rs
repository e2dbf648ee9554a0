//! Common functionality.

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub mod io;

/// Commonly used command line arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            verbose: Verbosity::new(0, 0),
        }
    }
}

lazy_static::lazy_static! {
    /// Canonical dbSNP reference SNP accession.
    static ref DBSNP_RE: regex::Regex =
        regex::Regex::new(r"^rs\d+$").expect("invalid regex in source code");
}

/// Return whether `label` is a canonical dbSNP identifier such as `rs1234`.
pub fn is_dbsnp_id(label: &str) -> bool {
    DBSNP_RE.is_match(label)
}

/// Expand `~` in user-provided paths.
pub fn expand_path(path: &str) -> String {
    shellexpand::tilde(path).into_owned()
}

/// The version of `snppis` package.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Return the version of the `snppis` crate and `x.y.z` in tests.
pub fn worker_version() -> &'static str {
    if cfg!(test) {
        "x.y.z"
    } else {
        VERSION
    }
}

/// Utilities for RocksDB databases.
pub mod rocksdb_utils {
    /// Function to fetch a meta value as a string from a RocksDB.
    pub fn fetch_meta(
        db: &rocksdb::DBWithThreadMode<rocksdb::MultiThreaded>,
        key: &str,
    ) -> Result<Option<String>, anyhow::Error> {
        let cf_meta = db
            .cf_handle("meta")
            .ok_or(anyhow::anyhow!("unknown column family: meta"))?;
        let raw_data = db.get_cf(&cf_meta, key.as_bytes())?;
        raw_data
            .map(|raw_data| {
                String::from_utf8(raw_data.to_vec())
                    .map_err(|e| anyhow::anyhow!("problem decoding utf8 (key={}): {}", key, e))
            })
            .transpose()
    }
}

#[cfg(test)]
mod test {
    #[rstest::rstest]
    #[case("rs1", true)]
    #[case("rs1234567890", true)]
    #[case("chr1_12345", false)]
    #[case("rs", false)]
    #[case("RS123", false)]
    #[case("rs12a", false)]
    #[case(" rs12", false)]
    fn is_dbsnp_id(#[case] label: &str, #[case] expected: bool) {
        assert_eq!(expected, super::is_dbsnp_id(label));
    }

    #[test]
    fn expand_path_keeps_plain_paths() {
        assert_eq!("tests/score", super::expand_path("tests/score"));
    }

    #[test]
    fn worker_version_in_tests() {
        assert_eq!("x.y.z", super::worker_version());
    }
}
