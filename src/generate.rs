//! HTML site generation.
//!
//! Stage 3 of the build pipeline. Takes the resolved manifest and writes the
//! final static HTML site. No lookups happen here: every passage on every
//! page was fetched by the resolve stage.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): topics grouped by tradition
//! - **Topic pages** (`/topics/{slug}/index.html`): one content card per entry
//! - **Markdown pages** (`/{slug}.html`): root `.md` files converted to HTML
//! - **Scripture index** (`/scripture/index.html`): every pre-rendered chapter
//! - **Chapter pages** (`/scripture/{book}/{chapter}/index.html`)
//! - **Verse pages** (`/scripture/{book}/{chapter}/{verse}/index.html`): the
//!   verse, a side-by-side translation table, commentary and cross-references
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── about.html
//! ├── topics/
//! │   └── judaism/index.html
//! └── scripture/
//!     ├── index.html
//!     └── john/
//!         └── 3/
//!             ├── index.html
//!             └── 16/index.html
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. The
//! stylesheet in `static/style.css` is embedded at compile time.

use crate::reference::Reference;
use crate::resolve::{Quote, ResolvedSite, ResolvedTopic, ScriptureContent, ScripturePage};
use crate::routes::Route;
use crate::scripture::{Chapter, Commentary, CrossReference, ParallelSet, Verse};
use crate::types::{ContentEntry, NavItem, Page};
use log::debug;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS: &str = include_str!("../static/style.css");

/// Everything a page needs besides its own content.
struct Context<'a> {
    site_title: &'a str,
    navigation: &'a [NavItem],
    pages: &'a [Page],
    /// Paths of scripture pages that exist, for deciding what to link.
    scripture_paths: HashSet<&'a str>,
}

impl Context<'_> {
    fn scripture_link(&self, path: &str) -> Option<String> {
        self.scripture_paths
            .contains(path)
            .then(|| format!("/{path}"))
    }
}

/// Generate the site from a resolved manifest on disk.
///
/// Returns the written files, relative to `output_dir`.
pub fn generate(manifest_path: &Path, output_dir: &Path) -> Result<Vec<String>, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let site: ResolvedSite = serde_json::from_str(&manifest_content)?;
    write_site(&site, output_dir)
}

pub fn write_site(site: &ResolvedSite, output_dir: &Path) -> Result<Vec<String>, GenerateError> {
    let ctx = Context {
        site_title: &site.config.title,
        navigation: &site.navigation,
        pages: &site.pages,
        scripture_paths: site.scripture.iter().map(|p| p.path.as_str()).collect(),
    };

    fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();
    let mut write = |rel: String, markup: Markup| -> Result<(), GenerateError> {
        let path = output_dir.join(&rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, markup.into_string())?;
        debug!("wrote {rel}");
        written.push(rel);
        Ok(())
    };

    write("index.html".to_string(), render_index(site, &ctx))?;

    for page in &site.pages {
        write(format!("{}.html", page.slug), render_page(page, &ctx))?;
    }

    for topic in &site.topics {
        write(
            format!("topics/{}/index.html", topic.topic.slug),
            render_topic_page(topic, &ctx),
        )?;
    }

    write(
        "scripture/index.html".to_string(),
        render_scripture_index(&site.scripture, &ctx),
    )?;

    for page in &site.scripture {
        let markup = match &page.content {
            ScriptureContent::Chapter { chapter } => render_chapter_page(page, chapter, &ctx),
            ScriptureContent::Verse {
                verse,
                parallel,
                commentary,
            } => render_verse_page(page, verse, parallel, commentary, &ctx),
        };
        write(format!("{}index.html", page.path), markup)?;
    }

    Ok(written)
}

fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Renders the site header with breadcrumb and navigation
fn site_header(breadcrumb: Markup, nav: Markup) -> Markup {
    html! {
        header.site-header {
            nav.breadcrumb {
                (breadcrumb)
            }
            nav.site-nav {
                (nav)
            }
        }
    }
}

/// Renders the navigation menu: topics, then the scripture index and pages.
pub fn render_nav(items: &[NavItem], current_path: &str, pages: &[Page]) -> Markup {
    html! {
        ul {
            @for item in items {
                (render_nav_item(item, current_path))
            }
            li.nav-separator role="separator" {}
            @let in_scripture = current_path.starts_with("scripture");
            li class=[in_scripture.then_some("current")] {
                a href="/scripture/" { "Scripture" }
            }
            @for page in pages.iter().filter(|p| p.in_nav) {
                @let is_current = current_path == page.slug;
                li class=[is_current.then_some("current")] {
                    a href={ "/" (page.slug) ".html" } { (page.link_title) }
                }
            }
        }
    }
}

/// Renders a single navigation item (may have children)
fn render_nav_item(item: &NavItem, current_path: &str) -> Markup {
    let is_current =
        item.path == current_path || current_path.starts_with(&format!("{}/", item.path));

    html! {
        li class=[is_current.then_some("current")] {
            @if item.children.is_empty() {
                a href={ "/" (item.path) "/" } { (item.title) }
            } @else {
                span.nav-group { (item.title) }
                ul {
                    @for child in &item.children {
                        (render_nav_item(child, current_path))
                    }
                }
            }
        }
    }
}

fn home_link(ctx: &Context) -> Markup {
    html! { a href="/" { (ctx.site_title) } }
}

/// A titled bullet list, or nothing when empty.
fn render_list(heading: &str, class: &str, items: &[String]) -> Markup {
    html! {
        @if !items.is_empty() {
            section class=(class) {
                h3 { (heading) }
                ul {
                    @for item in items {
                        li { (item) }
                    }
                }
            }
        }
    }
}

fn render_quote(quote: &Quote, ctx: &Context) -> Markup {
    let href = quote
        .reference
        .parse::<Reference>()
        .ok()
        .map(Route::for_reference)
        .and_then(|route| ctx.scripture_link(&route.path));

    html! {
        blockquote.passage {
            @match &quote.text {
                Some(text) => { p { (text) } }
                None => { p.unavailable { "Passage unavailable" } }
            }
            cite {
                @match href {
                    Some(href) => { a href=(href) { (quote.reference) } }
                    None => { (quote.reference) }
                }
                " (" (quote.translation) ")"
            }
        }
    }
}

fn render_entry(entry: &ContentEntry, quotes: &[Quote], ctx: &Context) -> Markup {
    html! {
        article.entry {
            h2 { (entry.title) }
            (render_list("Key Points", "key-points", &entry.key_points))
            (render_list("Historical References", "historical-references", &entry.historical_references))
            @if !entry.significance.trim().is_empty() {
                section.significance {
                    h3 { "Significance" }
                    (PreEscaped(markdown_to_html(&entry.significance)))
                }
            }
            (render_list("Elements", "elements", &entry.elements))
            (render_list("Practices", "practices", &entry.practices))
            @if !quotes.is_empty() {
                section.passages {
                    h3 { "Scripture" }
                    @for quote in quotes {
                        (render_quote(quote, ctx))
                    }
                }
            }
            (render_list("Recommended Reading", "recommended-reading", &entry.recommended_reading))
        }
    }
}

fn reference_link(reference: &str, path: Option<String>) -> Markup {
    html! {
        @match path {
            Some(href) => { a href=(href) { (reference) } }
            None => { (reference) }
        }
    }
}

fn render_cross_reference(xref: &CrossReference, ctx: &Context) -> Markup {
    let route = Route::for_reference(xref.reference.clone());
    html! {
        li {
            (reference_link(&xref.reference.to_string(), ctx.scripture_link(&route.path)))
            @if !xref.preview.is_empty() {
                " "
                span.preview { (xref.preview) }
            }
        }
    }
}

fn render_parallel_table(set: &ParallelSet) -> Markup {
    html! {
        table.parallel {
            thead {
                tr {
                    @for (translation, _) in set.columns() {
                        th { (translation) }
                    }
                }
            }
            tbody {
                tr {
                    @for (_, verse) in set.columns() {
                        @match verse {
                            Some(verse) => { td { (verse.text) } }
                            None => { td.unavailable { "unavailable" } }
                        }
                    }
                }
            }
        }
    }
}

fn render_commentary(entry: &Commentary) -> Markup {
    html! {
        li.commentary {
            p { (entry.text) }
            p.attribution {
                (entry.author) ", " em { (entry.source) }
                @if let Some(date) = &entry.date {
                    " (" (date) ")"
                }
            }
        }
    }
}

/// Breadcrumb trail for a scripture page: home › Scripture › Book N › N:V
fn scripture_breadcrumb(page: &ScripturePage, ctx: &Context) -> Markup {
    let chapter_ref = page.reference.chapter_reference();
    let chapter_path = Route::for_reference(chapter_ref.clone()).path;
    html! {
        (home_link(ctx))
        " › "
        a href="/scripture/" { "Scripture" }
        " › "
        @if page.reference.verse().is_some() {
            (reference_link(&chapter_ref.to_string(), ctx.scripture_link(&chapter_path)))
            " › "
        }
        (page.reference)
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the index page: topics by tradition, then the scripture index link
fn render_index(site: &ResolvedSite, ctx: &Context) -> Markup {
    let nav = render_nav(ctx.navigation, "", ctx.pages);
    let breadcrumb = home_link(ctx);

    let content = html! {
        (site_header(breadcrumb, nav))
        main.index-page {
            h1 { (ctx.site_title) }
            @for item in ctx.navigation {
                @if item.children.is_empty() {
                    section.topic-group {
                        a.topic-card href={ "/" (item.path) "/" } { (item.title) }
                    }
                } @else {
                    section.topic-group {
                        h2 { (item.title) }
                        @for child in &item.children {
                            a.topic-card href={ "/" (child.path) "/" } { (child.title) }
                        }
                    }
                }
            }
            @if !site.scripture.is_empty() {
                p.scripture-link {
                    a href="/scripture/" { "Browse scripture" }
                }
            }
        }
    };

    base_document(ctx.site_title, CSS, None, content)
}

/// Renders any topic page. Every topic shares this layout; only the entries
/// and their quotes differ.
fn render_topic_page(resolved: &ResolvedTopic, ctx: &Context) -> Markup {
    let topic = &resolved.topic;
    let current = format!("topics/{}", topic.slug);
    let nav = render_nav(ctx.navigation, &current, ctx.pages);
    let no_quotes: Vec<Quote> = Vec::new();

    let breadcrumb = html! {
        (home_link(ctx))
        " › "
        @if let Some(tradition) = &topic.tradition {
            (tradition) " › "
        }
        (topic.title)
    };

    let content = html! {
        (site_header(breadcrumb, nav))
        main.topic-page {
            header.topic-header {
                h1 { (topic.title) }
                @if let Some(intro) = &topic.intro {
                    div.topic-intro { (PreEscaped(markdown_to_html(intro))) }
                }
            }
            @for (idx, entry) in topic.entries.iter().enumerate() {
                (render_entry(entry, resolved.quotes.get(idx).unwrap_or(&no_quotes), ctx))
            }
        }
    };

    base_document(&topic.title, CSS, Some("topic"), content)
}

/// Renders a page from markdown content
fn render_page(page: &Page, ctx: &Context) -> Markup {
    let nav = render_nav(ctx.navigation, &page.slug, ctx.pages);

    let breadcrumb = html! {
        (home_link(ctx))
        " › "
        (page.title)
    };

    let content = html! {
        (site_header(breadcrumb, nav))
        main.page {
            article.page-content {
                (PreEscaped(markdown_to_html(&page.body)))
            }
        }
    };

    base_document(&page.title, CSS, None, content)
}

/// Renders the list of pre-rendered chapters, grouped by book
fn render_scripture_index(pages: &[ScripturePage], ctx: &Context) -> Markup {
    let nav = render_nav(ctx.navigation, "scripture", ctx.pages);
    let mut books: Vec<(String, Vec<&ScripturePage>)> = Vec::new();
    for page in pages.iter().filter(|p| p.reference.verse().is_none()) {
        let book = page.reference.book().to_string();
        match books.iter_mut().find(|(b, _)| *b == book) {
            Some((_, chapters)) => chapters.push(page),
            None => books.push((book, vec![page])),
        }
    }

    let breadcrumb = html! {
        (home_link(ctx))
        " › "
        "Scripture"
    };

    let content = html! {
        (site_header(breadcrumb, nav))
        main.scripture-index {
            h1 { "Scripture" }
            @if books.is_empty() {
                p { "No passages have been published." }
            }
            @for (book, chapters) in &books {
                section.book {
                    h2 { (book) }
                    ul.chapters {
                        @for chapter in chapters {
                            li {
                                a href={ "/" (chapter.path) } { (chapter.reference.chapter()) }
                            }
                        }
                    }
                }
            }
        }
    };

    base_document("Scripture", CSS, None, content)
}

/// Renders a chapter: every verse in the default translation
fn render_chapter_page(page: &ScripturePage, chapter: &Chapter, ctx: &Context) -> Markup {
    let nav = render_nav(ctx.navigation, &page.path, ctx.pages);

    let content = html! {
        (site_header(scripture_breadcrumb(page, ctx), nav))
        main.chapter-page {
            h1 { (chapter.reference) " " span.translation { (chapter.translation) } }
            ol.verses {
                @for line in &chapter.verses {
                    @let verse_path = Route::for_reference(page.reference.with_verse(line.number)).path;
                    li value=(line.number) {
                        @match ctx.scripture_link(&verse_path) {
                            Some(href) => { a.verse-number href=(href) { (line.number) } }
                            None => { span.verse-number { (line.number) } }
                        }
                        " " (line.text)
                    }
                }
            }
        }
    };

    base_document(&chapter.reference, CSS, Some("scripture"), content)
}

/// Renders a verse with its translations side by side
fn render_verse_page(
    page: &ScripturePage,
    verse: &Verse,
    parallel: &ParallelSet,
    commentary: &[Commentary],
    ctx: &Context,
) -> Markup {
    let nav = render_nav(ctx.navigation, &page.path, ctx.pages);

    let content = html! {
        (site_header(scripture_breadcrumb(page, ctx), nav))
        main.verse-page {
            h1 { (verse.reference) }
            blockquote.primary {
                p { (verse.text) }
                cite { (verse.translation) }
            }
            @if let Some(context) = &verse.context {
                section.context {
                    h2 { "Context" }
                    @for line in context.lines() {
                        p { (line) }
                    }
                }
            }
            @if parallel.columns().next().is_some() {
                section.translations {
                    h2 { "Translations" }
                    (render_parallel_table(parallel))
                }
            }
            @if !commentary.is_empty() {
                section.commentaries {
                    h2 { "Commentary" }
                    ul {
                        @for entry in commentary {
                            (render_commentary(entry))
                        }
                    }
                }
            }
            @if !verse.cross_references.is_empty() {
                section.cross-references {
                    h2 { "Cross References" }
                    ul {
                        @for xref in &verse.cross_references {
                            (render_cross_reference(xref, ctx))
                        }
                    }
                }
            }
        }
    };

    base_document(&verse.reference, CSS, Some("scripture"), content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::reference::Translation;
    use crate::scripture::VerseLine;
    use crate::types::Topic;
    use tempfile::TempDir;

    fn ctx<'a>(navigation: &'a [NavItem], pages: &'a [Page], paths: &[&'a str]) -> Context<'a> {
        Context {
            site_title: "Comparative Scripture",
            navigation,
            pages,
            scripture_paths: paths.iter().copied().collect(),
        }
    }

    fn verse(reference: &str, code: &str, text: &str) -> Verse {
        Verse {
            reference: reference.to_string(),
            translation: Translation::new(code),
            text: text.to_string(),
            context: None,
            cross_references: vec![],
        }
    }

    fn verse_page(reference: &str) -> ScripturePage {
        let reference = Reference::parse(reference).unwrap();
        let route = Route::for_reference(reference.clone());
        ScripturePage {
            path: route.path,
            reference,
            content: ScriptureContent::Chapter {
                chapter: Chapter {
                    reference: String::new(),
                    translation: Translation::new("NIV"),
                    verses: vec![],
                },
            },
        }
    }

    fn sample_topic() -> ResolvedTopic {
        ResolvedTopic {
            topic: Topic {
                title: "Judaism".to_string(),
                slug: "judaism".to_string(),
                tradition: Some("Abrahamic".to_string()),
                intro: Some("The faith of *Israel*.".to_string()),
                entries: vec![ContentEntry {
                    title: "The Covenant".to_string(),
                    key_points: vec!["Given at Sinai".to_string()],
                    significance: "Foundation of **law**.".to_string(),
                    passages: vec![Reference::parse("Exodus 20:2").unwrap()],
                    ..Default::default()
                }],
                in_nav: true,
                sort_key: 10,
                source_path: "topics/010-judaism.toml".to_string(),
            },
            quotes: vec![vec![Quote {
                reference: "Exodus 20:2".to_string(),
                translation: Translation::new("NIV"),
                text: Some("I am the LORD your God".to_string()),
            }]],
        }
    }

    #[test]
    fn nav_renders_items() {
        let items = vec![NavItem {
            title: "Judaism".to_string(),
            path: "topics/judaism".to_string(),
            children: vec![],
        }];
        let html = render_nav(&items, "", &[]).into_string();
        assert!(html.contains("Judaism"));
        assert!(html.contains("/topics/judaism/"));
        assert!(html.contains("/scripture/"));
    }

    #[test]
    fn nav_includes_numbered_pages_only() {
        let pages = vec![
            Page {
                title: "About".to_string(),
                link_title: "about".to_string(),
                slug: "about".to_string(),
                body: String::new(),
                in_nav: true,
                sort_key: 40,
            },
            Page {
                title: "Drafts".to_string(),
                link_title: "drafts".to_string(),
                slug: "drafts".to_string(),
                body: String::new(),
                in_nav: false,
                sort_key: u32::MAX,
            },
        ];
        let html = render_nav(&[], "", &pages).into_string();
        assert!(html.contains("/about.html"));
        assert!(!html.contains("/drafts.html"));
    }

    #[test]
    fn nav_marks_current_child() {
        let items = vec![NavItem {
            title: "Abrahamic".to_string(),
            path: "traditions/abrahamic".to_string(),
            children: vec![NavItem {
                title: "Judaism".to_string(),
                path: "topics/judaism".to_string(),
                children: vec![],
            }],
        }];
        let html = render_nav(&items, "topics/judaism", &[]).into_string();
        assert!(html.contains("nav-group"));
        assert!(html.contains(r#"class="current"#));
    }

    #[test]
    fn base_document_includes_doctype() {
        let content = html! { p { "test" } };
        let doc = base_document("Test", "body {}", None, content).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("body {}"));
    }

    #[test]
    fn site_header_structure() {
        let breadcrumb = html! { a href="/" { "Home" } };
        let nav = html! { ul { li { "Item" } } };
        let header = site_header(breadcrumb, nav).into_string();

        assert!(header.contains("site-header"));
        assert!(header.contains("breadcrumb"));
        assert!(header.contains("site-nav"));
    }

    // =========================================================================
    // Topic pages
    // =========================================================================

    #[test]
    fn topic_page_renders_entry_sections() {
        let topic = sample_topic();
        let html = render_topic_page(&topic, &ctx(&[], &[], &[])).into_string();
        assert!(html.contains("<h1>Judaism</h1>"));
        assert!(html.contains("<em>Israel</em>"));
        assert!(html.contains("Key Points"));
        assert!(html.contains("Given at Sinai"));
        assert!(html.contains("<strong>law</strong>"));
        assert!(html.contains("I am the LORD your God"));
    }

    #[test]
    fn topic_page_skips_empty_sections() {
        let topic = sample_topic();
        let html = render_topic_page(&topic, &ctx(&[], &[], &[])).into_string();
        assert!(!html.contains("Practices"));
        assert!(!html.contains("Recommended Reading"));
    }

    #[test]
    fn quote_links_only_to_existing_pages() {
        let topic = sample_topic();
        let without = render_topic_page(&topic, &ctx(&[], &[], &[])).into_string();
        assert!(!without.contains("/scripture/exodus/20/2/"));

        let with = render_topic_page(&topic, &ctx(&[], &[], &["scripture/exodus/20/2/"]))
            .into_string();
        assert!(with.contains(r#"href="/scripture/exodus/20/2/""#));
    }

    #[test]
    fn unavailable_quote_is_marked() {
        let mut topic = sample_topic();
        topic.quotes[0][0].text = None;
        let html = render_topic_page(&topic, &ctx(&[], &[], &[])).into_string();
        assert!(html.contains("Passage unavailable"));
        assert!(html.contains("Exodus 20:2"));
    }

    // =========================================================================
    // Scripture pages
    // =========================================================================

    #[test]
    fn parallel_table_marks_missing_translation() {
        let reference = Reference::parse("John 3:16").unwrap();
        let mut set = ParallelSet::new(
            reference,
            vec![Translation::new("NIV"), Translation::new("WEB"), Translation::new("KJV")],
        );
        set.insert(verse("John 3:16", "NIV", "For God so loved")).unwrap();
        set.insert(verse("John 3:16", "KJV", "For God so loved the world"))
            .unwrap();

        let html = render_parallel_table(&set).into_string();
        let niv = html.find("<th>NIV</th>").unwrap();
        let web = html.find("<th>WEB</th>").unwrap();
        let kjv = html.find("<th>KJV</th>").unwrap();
        assert!(niv < web && web < kjv);
        assert!(html.contains(r#"<td class="unavailable">unavailable</td>"#));
    }

    #[test]
    fn verse_page_renders_all_sections() {
        let page = verse_page("John 3:16");
        let mut primary = verse("John 3:16", "NIV", "For God so loved the world");
        primary.context = Some("15 that everyone\n17 For God did not send".to_string());
        primary.cross_references = vec![CrossReference {
            reference: Reference::parse("Romans 5:8").unwrap(),
            preview: "But God demonstrates".to_string(),
        }];
        let mut set = ParallelSet::new(page.reference.clone(), vec![Translation::new("NIV")]);
        set.insert(primary.clone()).unwrap();
        let commentary = vec![Commentary {
            author: "Matthew Henry".to_string(),
            source: "Commentary".to_string(),
            text: "Love.".to_string(),
            date: Some("1706".to_string()),
        }];

        let html = render_verse_page(&page, &primary, &set, &commentary, &ctx(&[], &[], &[]))
            .into_string();
        assert!(html.contains("<h1>John 3:16</h1>"));
        assert!(html.contains("17 For God did not send"));
        assert!(html.contains("Translations"));
        assert!(html.contains("Matthew Henry"));
        assert!(html.contains("(1706)"));
        assert!(html.contains("Romans 5:8"));
        assert!(html.contains("But God demonstrates"));
    }

    #[test]
    fn chapter_page_links_existing_verses() {
        let page = verse_page("John 3");
        let chapter = Chapter {
            reference: "John 3".to_string(),
            translation: Translation::new("NIV"),
            verses: vec![
                VerseLine {
                    number: 16,
                    text: "For God so loved".to_string(),
                },
                VerseLine {
                    number: 17,
                    text: "For God did not send".to_string(),
                },
            ],
        };
        let html = render_chapter_page(&page, &chapter, &ctx(&[], &[], &["scripture/john/3/16/"]))
            .into_string();
        assert!(html.contains(r#"href="/scripture/john/3/16/""#));
        assert!(!html.contains(r#"href="/scripture/john/3/17/""#));
        assert!(html.contains("For God did not send"));
    }

    #[test]
    fn scripture_index_groups_chapters_by_book() {
        let pages = vec![
            verse_page("Genesis 1"),
            verse_page("Genesis 1:1"),
            verse_page("John 3"),
        ];
        let html = render_scripture_index(&pages, &ctx(&[], &[], &[])).into_string();
        assert!(html.contains("<h2>Genesis</h2>"));
        assert!(html.contains("<h2>John</h2>"));
        assert!(html.contains(r#"href="/scripture/genesis/1/""#));
        assert!(!html.contains(r#"href="/scripture/genesis/1/1/""#));
    }

    #[test]
    fn page_converts_markdown() {
        let page = Page {
            title: "About".to_string(),
            link_title: "about".to_string(),
            slug: "about".to_string(),
            body: "# About\n\nThis is **bold** and *italic*.".to_string(),
            in_nav: true,
            sort_key: 40,
        };
        let html = render_page(&page, &ctx(&[], &[], &[])).into_string();
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<title>About</title>"));
    }

    #[test]
    fn html_escape_in_maud() {
        let items = vec![NavItem {
            title: "<script>alert('xss')</script>".to_string(),
            path: "test".to_string(),
            children: vec![],
        }];
        let html = render_nav(&items, "", &[]).into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn write_site_creates_expected_files() {
        let tmp = TempDir::new().unwrap();
        let site = ResolvedSite {
            navigation: vec![],
            topics: vec![sample_topic()],
            pages: vec![],
            scripture: vec![],
            skipped: vec![],
            config: SiteConfig::default(),
        };
        let written = write_site(&site, tmp.path()).unwrap();
        assert_eq!(
            written,
            vec![
                "index.html",
                "topics/judaism/index.html",
                "scripture/index.html"
            ]
        );
        assert!(tmp.path().join("topics/judaism/index.html").exists());
    }
}
