//! CLI command messaging
//!
//! Tagged one-line messages for `login`, `logout`, `whoami`, `report` and the
//! other headless commands.

const YELLOW: &str = "\x1b[1;33m";
const LIGHT_RED: &str = "\x1b[1;91m";
const RED: &str = "\x1b[1;31m";
const GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

fn tagged(color: &str, tag: &str, title: &str, details: &str) -> String {
    if details.is_empty() {
        format!("{}[{}]{} {}", color, tag, RESET, title)
    } else {
        format!("{}[{}]{} {}\t {}", color, tag, RESET, title, details)
    }
}

pub fn print_info(title: &str, details: &str) {
    println!("{}", tagged(YELLOW, "INFO", title, details));
}

pub fn print_warn(title: &str, details: &str) {
    println!("{}", tagged(LIGHT_RED, "AVISO", title, details));
}

/// Errors go to stderr so `list` output stays pipeable.
pub fn print_error(title: &str, details: Option<&str>) {
    eprintln!("{}", tagged(RED, "ERROR", title, ""));
    if let Some(details) = details {
        eprintln!("{}", tagged(RED, "ERROR", "Detalle:", details));
    }
}

pub fn print_success(title: &str, details: &str) {
    println!("{}", tagged(GREEN, "OK", title, details));
}

#[macro_export]
macro_rules! print_cmd_info {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_info($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_warn {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_warn($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_error {
    ($title:expr) => {
        $crate::cli_messages::print_error($title, None)
    };
    ($title:expr, $details:expr) => {
        $crate::cli_messages::print_error($title, Some($details))
    };
}

#[macro_export]
macro_rules! print_cmd_success {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_success($title, &format!($($details)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_follow_a_tab() {
        assert_eq!(
            tagged(GREEN, "OK", "Sesión iniciada", "admin"),
            "\x1b[1;32m[OK]\x1b[0m Sesión iniciada\t admin"
        );
        assert_eq!(tagged(YELLOW, "INFO", "Listo", ""), "\x1b[1;33m[INFO]\x1b[0m Listo");
    }
}
