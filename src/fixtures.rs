#[cfg(test)]
pub mod test {
    /// A config file that carries content the program does not own: a foreign
    /// section, a foreign key inside an owned section, comments and uneven
    /// spacing. Window state: x = 10, y = 20, w = 640, h = 480.
    pub const FOREIGN_CONFIG: &str = r#"# hello settings, edited by hand

[window]
title   = "Hello World"   # shown in the title bar
opacity = 0.9

[position]
x = 10
y = 20
monitor = 2 # second screen

[size]
w = 640 # width in pixels
h = 480

[log]
level = "info"
tint  = false

[plugins.greeter]
enabled = true
names = ["ann", "bob"]
"#;

    /// Every `[log]` key, none at its default.
    pub const FULL_LOG_SECTION: &str = r#"[log]
file = "/tmp/hello.log"
file-mode = "0640"
level = "notice"
slog = true
json = true
tint = false
time = true
time-us = true
time-tint = "15:04:05"
src = true
src-long = true
no-level = true
no-color = true
prefix = "hello"
add-key = "host"
add-value = "box"
"#;

    #[test]
    fn fixtures_are_valid_toml() {
        assert!(FOREIGN_CONFIG.parse::<toml_edit::DocumentMut>().is_ok());
        assert!(FULL_LOG_SECTION.parse::<toml_edit::DocumentMut>().is_ok());
    }
}
