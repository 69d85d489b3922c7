use std::process::Command;

use iced::{Background, Color};
use serde::Deserialize;

use crate::severity::Severity;

/// How the theme is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Dark,
    Light,
    /// Follow the desktop color scheme (re-checked periodically).
    Auto,
}

/// Colors used by the log pane and status bar, derived from the active theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    pub is_dark: bool,
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub status_bg: Color,
    pub info: Color,
    pub warning: Color,
    pub error: Color,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            is_dark: true,
            background: Color {
                r: 0.07,
                g: 0.07,
                b: 0.09,
                a: 1.0,
            },
            text: Color {
                r: 0.88,
                g: 0.88,
                b: 0.88,
                a: 1.0,
            },
            muted: Color {
                r: 1.0,
                g: 1.0,
                b: 1.0,
                a: 0.45,
            },
            status_bg: Color {
                r: 0.12,
                g: 0.12,
                b: 0.16,
                a: 1.0,
            },
            // Lighter than pure blue so it stays readable on dark backgrounds
            info: Color::from_rgb(0.40, 0.62, 1.0),
            warning: Color::from_rgb(1.0, 0.65, 0.0),
            error: Color::from_rgb(1.0, 0.33, 0.33),
        }
    }

    pub fn light() -> Self {
        Self {
            is_dark: false,
            background: Color::WHITE,
            text: Color {
                r: 0.08,
                g: 0.08,
                b: 0.08,
                a: 1.0,
            },
            muted: Color {
                r: 0.35,
                g: 0.35,
                b: 0.35,
                a: 0.9,
            },
            status_bg: Color {
                r: 0.92,
                g: 0.92,
                b: 0.95,
                a: 1.0,
            },
            info: Color::from_rgb(0.0, 0.0, 1.0),
            warning: Color::from_rgb(1.0, 0.55, 0.0),
            error: Color::from_rgb(0.85, 0.0, 0.0),
        }
    }

    pub fn for_severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
            Severity::Plain => self.text,
        }
    }

    pub fn status_bg_style(&self) -> impl Fn(&iced::Theme) -> iced::widget::container::Style {
        let color = self.status_bg;
        move |_theme: &iced::Theme| iced::widget::container::Style {
            background: Some(Background::Color(color)),
            ..Default::default()
        }
    }
}

/// Resolve the colors for a given mode.
pub fn resolve(mode: ThemeMode) -> ThemeColors {
    let dark = match mode {
        ThemeMode::Dark => true,
        ThemeMode::Light => false,
        ThemeMode::Auto => detect_system_dark(),
    };
    if dark {
        ThemeColors::dark()
    } else {
        ThemeColors::light()
    }
}

/// Detect whether the desktop prefers a dark color scheme.
///
/// Spawns CLI tools synchronously, so keep it off hot paths. Defaults to
/// light when nothing answers.
pub fn detect_system_dark() -> bool {
    let detected = if cfg!(windows) {
        windows_apps_theme()
    } else {
        portal_color_scheme()
            .or_else(gsettings_color_scheme)
            .or_else(|| std::env::var("GTK_THEME").ok().map(|v| v.to_lowercase().contains("dark")))
    };
    detected.unwrap_or(false)
}

/// Windows flag keeping the detection commands from opening a console window.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

fn detect_command(program: &str, args: &[&str]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    cmd
}

fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = detect_command(program, args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
}

/// XDG desktop portal (GNOME 42+, KDE 5.24+, COSMIC).
fn portal_color_scheme() -> Option<bool> {
    let stdout = command_stdout(
        "dbus-send",
        &[
            "--session",
            "--print-reply=literal",
            "--dest=org.freedesktop.portal.Desktop",
            "/org/freedesktop/portal/desktop",
            "org.freedesktop.portal.Settings.ReadOne",
            "string:org.freedesktop.appearance",
            "string:color-scheme",
        ],
    )?;
    parse_portal_reply(&stdout)
}

fn gsettings_color_scheme() -> Option<bool> {
    let stdout = command_stdout(
        "gsettings",
        &["get", "org.gnome.desktop.interface", "color-scheme"],
    )?;
    parse_gsettings_scheme(&stdout)
}

fn windows_apps_theme() -> Option<bool> {
    let stdout = command_stdout(
        "reg",
        &[
            "query",
            r"HKCU\Software\Microsoft\Windows\CurrentVersion\Themes\Personalize",
            "/v",
            "AppsUseLightTheme",
        ],
    )?;
    parse_windows_reg(&stdout)
}

/// color-scheme: 0 = no preference, 1 = dark, 2 = light
fn parse_portal_reply(stdout: &str) -> Option<bool> {
    if stdout.contains("uint32 1") {
        Some(true)
    } else if stdout.contains("uint32 2") {
        Some(false)
    } else {
        None
    }
}

fn parse_gsettings_scheme(stdout: &str) -> Option<bool> {
    if stdout.contains("prefer-dark") {
        Some(true)
    } else if stdout.contains("prefer-light") || stdout.contains("default") {
        Some(false)
    } else {
        None
    }
}

/// `AppsUseLightTheme    REG_DWORD    0x0` means dark.
fn parse_windows_reg(stdout: &str) -> Option<bool> {
    let value = stdout
        .lines()
        .find(|l| l.contains("AppsUseLightTheme"))?
        .split_whitespace()
        .last()?;
    match value {
        "0x0" => Some(true),
        "0x1" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_colors_follow_keyword() {
        let colors = ThemeColors::light();
        assert_eq!(colors.for_severity(Severity::Error), colors.error);
        assert_eq!(colors.for_severity(Severity::Warning), colors.warning);
        assert_eq!(colors.for_severity(Severity::Info), colors.info);
        assert_eq!(colors.for_severity(Severity::Plain), colors.text);
    }

    #[test]
    fn fixed_modes_skip_detection() {
        assert!(resolve(ThemeMode::Dark).is_dark);
        assert!(!resolve(ThemeMode::Light).is_dark);
    }

    #[test]
    fn portal_reply() {
        assert_eq!(parse_portal_reply("   variant       uint32 1\n"), Some(true));
        assert_eq!(parse_portal_reply("   variant       uint32 2\n"), Some(false));
        assert_eq!(parse_portal_reply("   variant       uint32 0\n"), None);
    }

    #[test]
    fn gsettings_scheme() {
        assert_eq!(parse_gsettings_scheme("'prefer-dark'\n"), Some(true));
        assert_eq!(parse_gsettings_scheme("'default'\n"), Some(false));
        assert_eq!(parse_gsettings_scheme(""), None);
    }

    #[test]
    fn detect_command_keeps_program_and_args() {
        let cmd = detect_command("reg", &["query", "/v", "AppsUseLightTheme"]);
        assert_eq!(cmd.get_program(), "reg");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["query", "/v", "AppsUseLightTheme"]);
    }

    #[test]
    fn windows_registry_value() {
        let dark = "\r\nHKEY_CURRENT_USER\\Software\\...\\Personalize\r\n    AppsUseLightTheme    REG_DWORD    0x0\r\n";
        let light = "    AppsUseLightTheme    REG_DWORD    0x1\r\n";
        assert_eq!(parse_windows_reg(dark), Some(true));
        assert_eq!(parse_windows_reg(light), Some(false));
        assert_eq!(parse_windows_reg("ERROR: not found"), None);
    }
}
