#![allow(missing_docs)]

use std::fmt;
use std::path::PathBuf;

pub use error_chain::bail;
use error_chain::error_chain;

/// Which of the two grid-sized buffers an allocation was for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationTarget {
    /// The buffer the production kernel renders into and that gets persisted
    Primary,
    /// The buffer the reference kernel renders into for the comparison
    Comparison,
}

impl fmt::Display for AllocationTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AllocationTarget::Primary => write!(f, "image"),
            AllocationTarget::Comparison => write!(f, "comparison"),
        }
    }
}

/// The step of persisting a bitmap that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStage {
    Create,
    Write,
    Close,
}

impl fmt::Display for IoStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IoStage::Create => write!(f, "created"),
            IoStage::Write => write!(f, "written"),
            IoStage::Close => write!(f, "closed"),
        }
    }
}

error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }

    foreign_links {
        Io(std::io::Error);
    }

    errors {
        InvalidResolution {
            description("invalid resolution")
            display("The resolution must not be negative or 0.")
        }
        InvalidIterationCount {
            description("invalid maximum iteration count")
            display("The maximum number of iterations must not be less than 0.")
        }
        InvalidRealStart {
            description("r_start out of range")
            display("The value for r_start must lie in the interval [-2;1].")
        }
        InvalidRealEnd {
            description("r_end out of range")
            display("The value for r_end must lie in the interval [-2;1].")
        }
        InvalidImaginaryStart {
            description("i_start out of range")
            display("The value for i_start must lie in the interval [-1;1].")
        }
        InvalidImaginaryEnd {
            description("i_end out of range")
            display("The value for i_end must lie in the interval [-1;1].")
        }
        DimensionOverflow {
            description("no representable image for the parameters")
            display("No image can be rendered with the given parameters.")
        }
        ImageTooLarge(bytes: u64) {
            description("image too large")
            display("The image to be created ({} bytes) is too large. Please use a smaller range or a coarser resolution.", bytes)
        }
        AllocationFailure(target: AllocationTarget) {
            description("allocation failure")
            display("Could not allocate enough memory for the {} buffer.", target)
        }
        IoFailure(stage: IoStage, path: PathBuf) {
            description("bitmap file i/o failure")
            display("The file '{}' could not be {}.", path.display(), stage)
        }
        ScenarioFailed(index: usize) {
            description("validation scenario failed")
            display("Test {}) failed", index)
        }
    }
}
