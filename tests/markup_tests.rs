use BookBlaster::pipeline::markup::{cut_tag, extract_tag, ExtractMode, TagScanner};
use BookBlaster::utils::text::normalize_text;

#[test]
fn test_raw_mode_returns_whole_occurrence_trimmed() {
    let data = "<p>  Hello <emphasis>world</emphasis>  </p>";
    assert_eq!(
        extract_tag(data, "p", ExtractMode::Raw),
        vec!["<p>  Hello <emphasis>world</emphasis>  </p>".to_string()]
    );
}

#[test]
fn test_normalized_mode_returns_normalized_inner_content() {
    let inner = "  Hello — <emphasis>“world”</emphasis>\u{00A0}\u{00A0}again ";
    let data = format!("before<p>{}</p>after", inner);
    assert_eq!(
        extract_tag(&data, "p", ExtractMode::Normalized),
        vec![normalize_text(inner)]
    );
    assert_eq!(normalize_text(inner), "Hello - «world» again");
}

#[test]
fn test_multiple_occurrences_in_order() {
    let data = "<p>one</p>\n<p>two</p>\n<p>three</p>";
    assert_eq!(
        extract_tag(data, "p", ExtractMode::Normalized),
        vec!["one", "two", "three"]
    );
}

#[test]
fn test_empty_bodies_are_dropped() {
    let data = "<p></p><p>   </p><p><emphasis></emphasis></p><p>kept</p>";
    assert_eq!(extract_tag(data, "p", ExtractMode::Normalized), vec!["kept"]);
}

#[test]
fn test_unterminated_tag_returns_remainder() {
    let data = "<p>closed</p><p>open until the very end";
    assert_eq!(
        extract_tag(data, "p", ExtractMode::Normalized),
        vec!["closed", "open until the very end"]
    );
    assert_eq!(
        extract_tag("x <table><tr>1", "table", ExtractMode::Raw),
        vec!["<table><tr>1"]
    );
}

#[test]
fn test_tag_names_match_exactly() {
    // `<p>` must not match `<poem>` or `<p class="x">`.
    let data = "<poem>verse</poem><p class=\"x\">attr</p><p>plain</p>";
    assert_eq!(extract_tag(data, "p", ExtractMode::Normalized), vec!["plain"]);
}

#[test]
fn test_cut_tag_removes_occurrences_and_joins_remainder() {
    let data = "  start <cite>quoted</cite> middle <cite>again</cite><cite>x</cite> end  ";
    assert_eq!(cut_tag(data, "cite"), "start\nmiddle\nend");
}

#[test]
fn test_cut_tag_without_occurrences_only_trims() {
    assert_eq!(cut_tag("  nothing here  ", "poem"), "nothing here");
    assert_eq!(cut_tag("", "poem"), "");
}

#[test]
fn test_removal_is_idempotent() {
    let samples = [
        "<poem><stanza>a</stanza></poem> text <poem>b</poem>",
        "<poem>never closed",
        "no poems at all",
    ];
    for sample in samples {
        let cut = cut_tag(sample, "poem");
        assert!(
            extract_tag(&cut, "poem", ExtractMode::Raw).is_empty(),
            "poem survived removal in {:?}",
            sample
        );
        assert!(extract_tag(&cut, "poem", ExtractMode::Normalized).is_empty());
        assert_eq!(cut_tag(&cut, "poem"), cut);
    }
}

#[test]
fn test_scanner_is_single_pass() {
    let data = "<title>a</title><title>b</title>";
    let mut scanner = TagScanner::new(data, "title", true);
    assert_eq!(scanner.next().map(|s| s.body), Some("a"));
    assert_eq!(scanner.next().map(|s| s.body), Some("b"));
    assert!(scanner.next().is_none());
    assert!(scanner.next().is_none());
}
