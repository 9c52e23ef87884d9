//! Shell quoting
//!
//! Stages normally run from an argument vector and never touch a shell.
//! When shell mode is enabled every word of the command line goes through
//! [`quote`]; nothing else in the crate builds shell text.

/// Quote one word for a POSIX shell
pub fn quote(word: &str) -> String {
    if !word.is_empty() && word.chars().all(is_safe) {
        return word.to_string();
    }
    let mut quoted = String::with_capacity(word.len() + 2);
    quoted.push('\'');
    for c in word.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

/// Join a program and its arguments into one shell command line
pub fn command_line<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    let mut line = quote(program);
    for arg in args {
        line.push(' ');
        line.push_str(&quote(arg.as_ref()));
    }
    line
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '=' | ':' | ',' | '+' | '@' | '%')
}
