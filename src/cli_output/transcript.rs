//! Line-based transcript rendering.

use unicode_width::UnicodeWidthStr;

use crate::markdown::{text_direction, BlockCache, BlockKind, TextDirection};
use crate::models::{ActivityStatus, ChatMessage, MessageKind, PlaylistData, ToolPanel};
use crate::storage::ThemePreference;

/// Line width used for right alignment and separators.
pub const LINE_WIDTH: usize = 60;

/// Status icons
pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const ACTIVE: &str = "⠋";
    pub const EXPANDED: &str = "▾";
    pub const COLLAPSED: &str = "▸";
}

const RESET: &str = "\x1b[0m";

/// ANSI colors per theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub user: &'static str,
    pub assistant: &'static str,
    pub status: &'static str,
    pub error: &'static str,
    pub heading: &'static str,
}

impl Palette {
    pub fn for_theme(theme: ThemePreference) -> Self {
        match theme {
            ThemePreference::Dark => Self {
                user: "\x1b[96m",
                assistant: "\x1b[97m",
                status: "\x1b[90m",
                error: "\x1b[91m",
                heading: "\x1b[1;95m",
            },
            ThemePreference::Light => Self {
                user: "\x1b[34m",
                assistant: "\x1b[30m",
                status: "\x1b[37m",
                error: "\x1b[31m",
                heading: "\x1b[1;35m",
            },
        }
    }
}

fn paint(color: &str, text: &str) -> String {
    format!("{}{}{}", color, text, RESET)
}

/// Pad a right-to-left line so it ends at [`LINE_WIDTH`].
pub fn align_line(line: &str, direction: TextDirection) -> String {
    match direction {
        TextDirection::Ltr => line.to_string(),
        TextDirection::Rtl => {
            let width = UnicodeWidthStr::width(line);
            let pad = LINE_WIDTH.saturating_sub(width);
            format!("{}{}", " ".repeat(pad), line)
        }
    }
}

fn activity_icon(status: ActivityStatus) -> &'static str {
    match status {
        ActivityStatus::Active => icons::ACTIVE,
        ActivityStatus::Completed => icons::SUCCESS,
        ActivityStatus::Error => icons::FAILURE,
    }
}

/// Tool panel header plus, when expanded, one line per activity.
pub fn format_tool_panel(panel: &ToolPanel, palette: &Palette) -> String {
    let toggle = if panel.is_expanded() {
        icons::EXPANDED
    } else {
        icons::COLLAPSED
    };
    let header = format!(
        "  {} {} Tools ({})",
        toggle,
        activity_icon(panel.rollup()),
        panel.len()
    );

    let mut lines = vec![paint(palette.status, &header)];
    if panel.is_expanded() {
        for activity in panel.activities() {
            let line = format!("      {} {}", activity_icon(activity.status), activity.label);
            lines.push(paint(palette.status, &line));
        }
    }
    lines.join("\n")
}

/// Render one conversation message.
pub fn format_message(message: &ChatMessage, cache: &mut BlockCache, palette: &Palette) -> String {
    match &message.kind {
        MessageKind::User { text } => {
            let line = format!("you › {}", text);
            paint(palette.user, &align_line(&line, text_direction(text)))
        }
        MessageKind::Status { text } => {
            let line = format!("  … {}", text);
            paint(palette.status, &align_line(&line, text_direction(text)))
        }
        MessageKind::ToolPanel(panel) => format_tool_panel(panel, palette),
        MessageKind::Assistant { text, is_error: true } => {
            let line = format!("{} {}", icons::FAILURE, text);
            paint(palette.error, &align_line(&line, text_direction(text)))
        }
        MessageKind::Assistant { text, .. } => {
            let mut lines = Vec::new();
            for block in cache.render(text) {
                let color = match block.kind {
                    BlockKind::Heading(_) => palette.heading,
                    _ => palette.assistant,
                };
                for (i, raw) in block.text.lines().enumerate() {
                    let raw = match (block.kind, i) {
                        (BlockKind::ListItem, 0) => format!("• {}", raw),
                        (BlockKind::ListItem, _) | (BlockKind::CodeBlock, _) => format!("  {}", raw),
                        _ => raw.to_string(),
                    };
                    lines.push(paint(color, &align_line(&raw, block.direction)));
                }
            }
            lines.join("\n")
        }
    }
}

/// Playlist summary with a numbered track list.
pub fn format_playlist(playlist: &PlaylistData) -> String {
    let mut lines = vec![
        "═".repeat(LINE_WIDTH),
        align_line(&playlist.name, text_direction(&playlist.name)),
        format!("by {}", playlist.owner),
    ];

    if playlist.is_empty() {
        lines.push(format!("{} tracks (still loading)", playlist.total_tracks));
    } else {
        lines.push(format!(
            "{} tracks, {}",
            playlist.tracks.len(),
            crate::models::format_duration(playlist.total_duration_ms())
        ));
        lines.push("─".repeat(LINE_WIDTH));
        for (i, track) in playlist.tracks.iter().enumerate() {
            let line = format!(
                "{:>2}. {} - {} ({})",
                i + 1,
                track.name,
                track.artist,
                track.duration_label()
            );
            lines.push(align_line(&line, text_direction(&line)));
        }
    }
    if let Some(url) = &playlist.url {
        lines.push(url.clone());
    }
    lines.push("═".repeat(LINE_WIDTH));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Palette {
        Palette::for_theme(ThemePreference::Dark)
    }

    #[test]
    fn test_rtl_lines_are_right_aligned() {
        let aligned = align_line("שלום", TextDirection::Rtl);
        assert_eq!(UnicodeWidthStr::width(aligned.as_str()), LINE_WIDTH);
        assert!(aligned.ends_with("שלום"));
        assert_eq!(align_line("hi", TextDirection::Ltr), "hi");
    }

    #[test]
    fn test_collapsed_panel_hides_activities() {
        let mut panel = ToolPanel::new();
        panel.start("Searching tracks");
        let expanded = format_tool_panel(&panel, &palette());
        assert!(expanded.contains("Searching tracks"));
        assert!(expanded.contains(icons::ACTIVE));

        panel.complete_all_active();
        panel.collapse();
        let collapsed = format_tool_panel(&panel, &palette());
        assert!(!collapsed.contains("Searching tracks"));
        assert!(collapsed.contains("Tools (1)"));
        assert!(collapsed.contains(icons::SUCCESS));
    }

    #[test]
    fn test_assistant_markdown_lines() {
        let mut cache = BlockCache::new();
        let message = ChatMessage::new(
            1,
            MessageKind::Assistant {
                text: "# Mix\n\n- One\n- Two".to_string(),
                is_error: false,
            },
        );
        let out = format_message(&message, &mut cache, &palette());
        assert!(out.contains("Mix"));
        assert!(out.contains("• One"));
        assert!(out.contains("• Two"));
    }

    #[test]
    fn test_error_message_marked() {
        let mut cache = BlockCache::new();
        let message = ChatMessage::new(
            2,
            MessageKind::Assistant {
                text: "Spotify is down".to_string(),
                is_error: true,
            },
        );
        let out = format_message(&message, &mut cache, &palette());
        assert!(out.contains(icons::FAILURE));
        assert!(out.contains("Spotify is down"));
    }

    #[test]
    fn test_playlist_summary() {
        let playlist: PlaylistData = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "Road Trip",
            "owner": "dj",
            "url": "https://open.spotify.com/playlist/p1",
            "tracks": [
                {"id": "t1", "name": "Go", "artist": "A", "duration_ms": 61000},
                {"id": "t2", "name": "Drive", "artist": "B", "duration_ms": 120000}
            ]
        }))
        .unwrap();
        let out = format_playlist(&playlist);
        assert!(out.contains("Road Trip"));
        assert!(out.contains("2 tracks, 3:01"));
        assert!(out.contains(" 1. Go - A (1:01)"));
        assert!(out.contains("open.spotify.com"));
    }

    #[test]
    fn test_empty_playlist_summary() {
        let playlist: PlaylistData =
            serde_json::from_value(serde_json::json!({"id": "p", "name": "New", "tracks": 12, "total_tracks": 12}))
                .unwrap();
        assert!(format_playlist(&playlist).contains("12 tracks (still loading)"));
    }
}
