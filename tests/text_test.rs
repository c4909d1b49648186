use leaflens_cli::search::format_book_name;
use leaflens_cli::ui::text::{gradient_line, wrap_text};

/// Width left for an answer after the "Leaf: " prefix in a 40-column list.
const ANSWER_WIDTH: usize = 40 - "Leaf: ".len();

#[test]
fn test_book_name_fits_on_one_line() {
    let wrapped = wrap_text("Book Name: Moby Dick", ANSWER_WIDTH);
    assert_eq!(wrapped, vec!["Book Name: Moby Dick"]);
}

#[test]
fn test_long_book_name_wraps_between_words() {
    let title = format_book_name("the_strange_case_of_dr_jekyll_and_mr_hyde.txt");
    let wrapped = wrap_text(&format!("Book Name: {}", title), ANSWER_WIDTH);

    assert_eq!(
        wrapped,
        vec!["Book Name: The Strange Case Of Dr", "Jekyll And Mr Hyde"]
    );
    assert!(wrapped.iter().all(|line| line.chars().count() <= ANSWER_WIDTH));
}

#[test]
fn test_non_ascii_title_counts_characters() {
    // 34 characters, but more bytes than that
    let text = "Book Name: Les Misérables Çà Et Là";
    assert!(text.len() > ANSWER_WIDTH);

    let wrapped = wrap_text(text, ANSWER_WIDTH);
    assert_eq!(wrapped, vec![text]);
}

#[test]
fn test_revealed_prefix_mid_word_wraps_like_full_text() {
    // A partially revealed answer wraps on the same word boundaries
    let partial = "Book Name: The Strange Case Of Dr Jek";
    let wrapped = wrap_text(partial, ANSWER_WIDTH);
    assert_eq!(wrapped, vec!["Book Name: The Strange Case Of Dr", "Jek"]);
}

#[test]
fn test_empty_reveal_is_one_blank_line() {
    assert_eq!(wrap_text("", ANSWER_WIDTH), vec![String::new()]);
}

#[test]
fn test_pasted_snippet_normalizes_whitespace() {
    let snippet = "It was the best of times,\n\tit was the   worst of times";
    let wrapped = wrap_text(snippet, 80);
    assert_eq!(
        wrapped,
        vec!["It was the best of times, it was the worst of times"]
    );
}

#[test]
fn test_unbroken_token_keeps_its_own_line() {
    let path = "/home/reader/scans/a_very_long_file_name_for_a_page_photo.jpg";
    let wrapped = wrap_text(&format!("[image] {}", path), 20);
    assert_eq!(wrapped, vec!["[image]", path]);
}

#[test]
fn test_zero_width_returns_text_unchanged() {
    assert_eq!(wrap_text("call me  ishmael", 0), vec!["call me  ishmael"]);
}

#[test]
fn test_greeting_gradient_keeps_text() {
    let line = gradient_line("What book are you looking for?", 1, (173, 255, 47), (64, 224, 208));
    let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, "What book are you looking for?");
}
