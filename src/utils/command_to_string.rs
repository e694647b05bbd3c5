use std::borrow::Cow;

/// Render a command as a shell-like line, quoting arguments that contain whitespace,
/// so the logged line can be pasted back into a terminal
pub fn command_to_string(cmd: &std::process::Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let mut parts = vec![quote(program)];
    parts.extend(cmd.get_args().map(|arg| quote(arg.to_string_lossy())));
    parts.join(" ")
}

fn quote(s: Cow<'_, str>) -> Cow<'_, str> {
    if s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '\'') {
        Cow::Owned(format!("'{}'", s.replace('\'', r"'\''")))
    } else {
        s
    }
}
