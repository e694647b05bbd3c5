pub mod discovery;
pub mod engine;
pub mod pairing;
pub mod tool;

pub use discovery::find_r1_files;
pub use engine::{Fastp, FastpParams, DONE, FASTP_OUTPUT_DIR, NO_FASTQ_FILE, SCRIPT_FAILED};
pub use pairing::{pair_reads, Platform, ReadPair};
pub use tool::{fastp_args, FastpRunner, ToolRunner, DEFAULT_FASTP, DEFAULT_THREADS};
