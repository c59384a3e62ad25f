/// Exit status of a command, pipeline or expression.
///
/// `0` is success; anything else is failure. Processes killed by a signal
/// report the signal number.
pub type Status = i32;

pub const SUCCESS: Status = 0;
pub const FAILURE: Status = 1;

/// The single-character truth token a resolved `( ... )` group is replaced with.
///
/// Both tokens are builtins, so the rewritten expression stays executable.
pub fn truth_token(status: Status) -> char {
    if status == SUCCESS { 'T' } else { 'F' }
}
