//! Process exit codes
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | A schedule was produced (or the request checked out) |
//! | 1 | No feasible schedule exists |
//! | 2 | Malformed input, bad configuration, I/O or solver failure |

use std::process;

use shiftplan_core::ScheduleResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Infeasible = 1,
    Error = 2,
}

impl ExitCode {
    pub fn from_result(result: &ScheduleResult) -> Self {
        if result.is_success() {
            ExitCode::Success
        } else {
            ExitCode::Infeasible
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}
