//! Markdown block splitting for direction-aware display
//!
//! Assistant replies are markdown. Each paragraph, heading, list item and
//! code block is rendered as its own block and gets its own text direction,
//! so a Hebrew track list and an English intro can share one message.
//!
//! Includes a memoization layer (`BlockCache`) keyed by content hash so a
//! finished message is parsed once.

mod cache;
mod direction;

pub use cache::BlockCache;
pub use direction::{is_hebrew, text_direction, Alignment, TextDirection};

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Maximum number of entries in the block cache before eviction
pub const BLOCK_CACHE_MAX_ENTRIES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    /// Heading with its level, 1-6
    Heading(u8),
    ListItem,
    CodeBlock,
}

/// One display block with its own direction.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    pub kind: BlockKind,
    pub text: String,
    pub direction: TextDirection,
}

impl RenderedBlock {
    pub fn alignment(&self) -> Alignment {
        self.direction.alignment()
    }
}

/// Split markdown into display blocks, in document order.
///
/// Paragraphs inside a list item are folded into the item. Table rows
/// become paragraphs with cells separated by ` | `. Empty blocks are
/// dropped.
pub fn render_blocks(markdown: &str) -> Vec<RenderedBlock> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(markdown, options);

    // Blocks are pushed when they open so nested items keep document order
    let mut blocks: Vec<(BlockKind, String)> = Vec::new();
    // Index into `blocks` per open block; `None` for a paragraph merged into its item
    let mut open: Vec<Option<usize>> = Vec::new();

    fn current(open: &[Option<usize>]) -> Option<usize> {
        open.iter().rev().find_map(|slot| *slot)
    }

    for event in parser {
        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph => {
                    let in_item = current(&open)
                        .map(|i| blocks[i].0 == BlockKind::ListItem)
                        .unwrap_or(false);
                    if in_item {
                        if let Some(i) = current(&open) {
                            if !blocks[i].1.is_empty() {
                                blocks[i].1.push('\n');
                            }
                        }
                        open.push(None);
                    } else {
                        blocks.push((BlockKind::Paragraph, String::new()));
                        open.push(Some(blocks.len() - 1));
                    }
                }
                Tag::Heading { level, .. } => {
                    blocks.push((BlockKind::Heading(level as u8), String::new()));
                    open.push(Some(blocks.len() - 1));
                }
                Tag::Item => {
                    blocks.push((BlockKind::ListItem, String::new()));
                    open.push(Some(blocks.len() - 1));
                }
                Tag::CodeBlock(_) => {
                    blocks.push((BlockKind::CodeBlock, String::new()));
                    open.push(Some(blocks.len() - 1));
                }
                Tag::TableHead | Tag::TableRow => {
                    blocks.push((BlockKind::Paragraph, String::new()));
                    open.push(Some(blocks.len() - 1));
                }
                Tag::TableCell => {
                    if let Some(i) = current(&open) {
                        if !blocks[i].1.is_empty() {
                            blocks[i].1.push_str(" | ");
                        }
                    }
                }
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableHead
                | TagEnd::TableRow => {
                    open.pop();
                }
                _ => {}
            },
            Event::Text(text) | Event::Code(text) | Event::Html(text) | Event::InlineHtml(text) => {
                if let Some(i) = current(&open) {
                    blocks[i].1.push_str(&text);
                }
            }
            Event::SoftBreak => {
                if let Some(i) = current(&open) {
                    blocks[i].1.push(' ');
                }
            }
            Event::HardBreak => {
                if let Some(i) = current(&open) {
                    blocks[i].1.push('\n');
                }
            }
            _ => {}
        }
    }

    blocks
        .into_iter()
        .filter_map(|(kind, text)| {
            let text = match kind {
                BlockKind::CodeBlock => text.trim_end_matches('\n').to_string(),
                _ => text.trim().to_string(),
            };
            if text.trim().is_empty() {
                return None;
            }
            Some(RenderedBlock {
                kind,
                direction: text_direction(&text),
                text,
            })
        })
        .collect()
}
