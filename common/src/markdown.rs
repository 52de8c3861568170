//! Markdownレンダリング
//!
//! RAGサービスはMarkdownで回答する。Webでは HTML、CLIでは プレーンテキストに変換する。
//! 応答中の生HTMLは埋め込まずにテキストとしてエスケープする。

use pulldown_cmark::{html, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

fn options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// MarkdownをHTMLへ変換
pub fn to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

/// Markdownを端末表示用のプレーンテキストへ変換
pub fn to_plain_text(markdown: &str) -> String {
    let mut output = String::new();
    // ネストしたリストの番号（None: 箇条書き）
    let mut lists: Vec<Option<u64>> = Vec::new();

    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                ensure_blank_line(&mut output);
                if matches!(level, HeadingLevel::H1 | HeadingLevel::H2) {
                    output.push_str("■ ");
                }
            }
            Event::End(TagEnd::Heading(_)) | Event::End(TagEnd::Paragraph) => {
                output.push('\n');
            }
            Event::Start(Tag::Paragraph) => {
                if lists.is_empty() {
                    ensure_blank_line(&mut output);
                }
            }
            Event::Start(Tag::List(start)) => {
                if lists.is_empty() {
                    ensure_blank_line(&mut output);
                } else {
                    ensure_line_start(&mut output);
                }
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
            }
            Event::Start(Tag::Item) => {
                ensure_line_start(&mut output);
                let depth = lists.len().saturating_sub(1);
                output.push_str(&"  ".repeat(depth));
                match lists.last_mut() {
                    Some(Some(n)) => {
                        output.push_str(&format!("{}. ", n));
                        *n += 1;
                    }
                    _ => output.push_str("- "),
                }
            }
            Event::End(TagEnd::Item) => ensure_line_start(&mut output),
            Event::Start(Tag::CodeBlock(kind)) => {
                ensure_blank_line(&mut output);
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        output.push_str(&format!("[{}]\n", lang));
                    }
                }
            }
            Event::End(TagEnd::CodeBlock) => ensure_line_start(&mut output),
            Event::TaskListMarker(done) => output.push_str(if done { "[x] " } else { "[ ] " }),
            Event::Text(text) | Event::Code(text) | Event::Html(text) | Event::InlineHtml(text) => {
                output.push_str(&text)
            }
            Event::SoftBreak | Event::HardBreak => output.push('\n'),
            Event::Rule => {
                ensure_blank_line(&mut output);
                output.push_str("----------\n");
            }
            _ => {}
        }
    }

    output.trim().to_string()
}

fn ensure_line_start(output: &mut String) {
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
}

fn ensure_blank_line(output: &mut String) {
    ensure_line_start(output);
    if !output.is_empty() && !output.ends_with("\n\n") {
        output.push('\n');
    }
}
