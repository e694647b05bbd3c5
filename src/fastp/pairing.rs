use core::fmt;
use std::path::Path;

use crate::runtime::Error;

pub const READ1_DESIGNATOR: &str = "R1";
pub const READ2_DESIGNATOR: &str = "R2";
pub const FASTQ_GZ_SUFFIX: &str = ".fastq.gz";

/// Platform tag whose reads come with R1 and R2 swapped
pub const TENX_PLATFORM_TAG: &str = "10x";

/// How the reads of a pair are ordered when handed to fastp
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Platform {
    Standard,
    /// 10x Genomics: the biological read is in R2, the barcode read in R1
    ReversedReadOrder,
}

impl Platform {
    /// Translate the raw tag from the job config. Anything but the 10x tag,
    /// including an empty tag, is a standard platform
    pub fn from_tag(tag: &str) -> Self {
        if tag == TENX_PLATFORM_TAG {
            Platform::ReversedReadOrder
        } else {
            Platform::Standard
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Two read files of one paired-end unit, in the order fastp receives them
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReadPair {
    pub first: String,
    pub second: String,
}

impl ReadPair {
    /// Build the pair for a discovered R1 file. R2 is every "R1" in the path replaced by "R2"
    pub fn from_r1(r1: &Path, platform: Platform) -> Result<ReadPair, Error> {
        let r1 = r1.to_str().ok_or_else(|| Error::non_utf8_path(r1))?.to_string();
        let r2 = r1.replace(READ1_DESIGNATOR, READ2_DESIGNATOR);
        let pair = match platform {
            Platform::Standard => ReadPair { first: r1, second: r2 },
            Platform::ReversedReadOrder => ReadPair { first: r2, second: r1 },
        };
        Ok(pair)
    }

    /// Report base name: the first file of the pair without sample directory and suffix.
    /// For reversed platforms this is the R2 file
    pub fn output_name(&self, sample_dir: &str) -> String {
        self.first
            .replace(&format!("{}/", sample_dir), "")
            .replace(FASTQ_GZ_SUFFIX, "")
    }
}

/// Pair every discovered R1 file, keeping discovery order
pub fn pair_reads<P: AsRef<Path>>(r1_files: &[P], platform: Platform) -> Result<Vec<ReadPair>, Error> {
    r1_files
        .iter()
        .map(|r1| ReadPair::from_r1(r1.as_ref(), platform))
        .collect()
}
