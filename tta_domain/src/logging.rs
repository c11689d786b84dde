//! Plain stdout logging used by the whole workspace.

pub fn log(msg: &str, file: &str, line: u32, severity: u32) {
    println!("{}:{}:[{}] - {}", file, line, severity, msg);
}

pub fn log_debug(msg: &str, file: &str, line: u32) {
    log(msg, file, line, 1);
}
pub fn log_info(msg: &str, file: &str, line: u32) {
    log(msg, file, line, 2);
}
pub fn log_warn(msg: &str, file: &str, line: u32) {
    log(msg, file, line, 3);
}
pub fn log_error(msg: &str, file: &str, line: u32) {
    log(msg, file, line, 4);
}

#[macro_export]
macro_rules! log_debug {
    ($($args:tt)*) => {{
        $crate::log(&std::fmt::format(format_args!($($args)*)), file!(), line!(), 1);
    }}
}

#[macro_export]
macro_rules! log_info {
    ($($args:tt)*) => {{
        $crate::log(&std::fmt::format(format_args!($($args)*)), file!(), line!(), 2);
    }}
}

#[macro_export]
macro_rules! log_warn {
    ($($args:tt)*) => {{
        $crate::log(&std::fmt::format(format_args!($($args)*)), file!(), line!(), 3);
    }}
}

#[macro_export]
macro_rules! log_error {
    ($($args:tt)*) => {{
        $crate::log(&std::fmt::format(format_args!($($args)*)), file!(), line!(), 4);
    }}
}
