//! A byte document driving the map the way an editor's buffer model does:
//! every insert or erase on the bytes is reported to the map exactly once.

use n_ranges::NestedOffsetLengthMap;
use pretty_assertions::assert_eq;

struct Document {
    bytes: Vec<u8>,
    comments: NestedOffsetLengthMap<&'static str>,
}

impl Document {
    fn new(text: &str) -> Self {
        Self {
            bytes: text.as_bytes().to_vec(),
            comments: NestedOffsetLengthMap::new(),
        }
    }

    fn annotate(&mut self, needle: &str, comment: &'static str) -> bool {
        let offset = self
            .bytes
            .windows(needle.len())
            .position(|w| w == needle.as_bytes())
            .unwrap_or_else(|| panic!("{needle:?} not in document"));
        self.comments.set(offset as u64, needle.len() as u64, comment)
    }

    fn insert(&mut self, at: usize, text: &str) -> usize {
        self.bytes.splice(at..at, text.bytes());
        self.comments.data_inserted(at as u64, text.len() as u64)
    }

    fn erase(&mut self, at: usize, count: usize) -> usize {
        self.bytes.drain(at..at + count);
        self.comments.data_erased(at as u64, count as u64)
    }

    /// The text each comment currently covers, in key order.
    fn covered(&self) -> Vec<(&'static str, String)> {
        self.comments
            .iter()
            .map(|(key, comment)| {
                let start = usize::try_from(key.offset).unwrap_or(usize::MAX);
                let end = usize::try_from(key.end()).unwrap_or(usize::MAX);
                (*comment, String::from_utf8_lossy(&self.bytes[start..end]).into_owned())
            })
            .collect()
    }

    fn comment_at(&self, point: usize) -> Option<&'static str> {
        self.comments.get(point as u64).map(|(_, c)| *c)
    }
}

fn sample() -> Document {
    let mut doc = Document::new("MAGIC hdr=v2 body body body END");
    assert!(doc.annotate("MAGIC", "signature"));
    assert!(doc.annotate("hdr=v2", "header"));
    assert!(doc.annotate("v2", "version"));
    assert!(doc.annotate("body body body", "payload"));
    doc
}

#[test]
fn annotations_follow_text_through_edits() {
    let mut doc = sample();

    // Edits before, between and after annotations only move them.
    assert_eq!(doc.insert(0, ">>"), 4);
    assert_eq!(doc.erase(0, 2), 4);
    assert_eq!(doc.insert(doc.bytes.len(), "!!"), 0);

    assert_eq!(
        doc.covered(),
        vec![
            ("signature", "MAGIC".to_string()),
            ("header", "hdr=v2".to_string()),
            ("version", "v2".to_string()),
            ("payload", "body body body".to_string()),
        ]
    );
}

#[test]
fn typing_inside_an_annotation_extends_it() {
    let mut doc = sample();
    // "hdr=v2" starts at 6; type inside it, after "hdr".
    assert_eq!(doc.insert(9, "_x"), 3);
    assert_eq!(
        doc.covered()[1..3],
        [
            ("header", "hdr_x=v2".to_string()),
            ("version", "v2".to_string()),
        ]
    );
}

#[test]
fn deleting_an_annotated_word_drops_its_comment() {
    let mut doc = sample();
    // Remove "v2" entirely: version goes, header shrinks, payload moves.
    assert_eq!(doc.erase(10, 2), 3);
    assert_eq!(
        doc.covered(),
        vec![
            ("signature", "MAGIC".to_string()),
            ("header", "hdr=".to_string()),
            ("payload", "body body body".to_string()),
        ]
    );
    assert_eq!(doc.comment_at(9), Some("header"));
}

#[test]
fn partial_erase_keeps_surviving_bytes() {
    let mut doc = sample();
    // Erase "hdr=v2 bo": the header's tail and the payload's head.
    assert_eq!(doc.erase(6, 9), 3);
    assert_eq!(
        doc.covered(),
        vec![
            ("signature", "MAGIC".to_string()),
            ("payload", "dy body body".to_string()),
        ]
    );
}

#[test]
fn queries_see_nesting_after_edits() {
    let mut doc = sample();
    let _ = doc.insert(0, "\0\0\0\0");
    // "v2" now sits at 14.
    let kinds: Vec<&str> = doc.comments.get_all(14).into_iter().map(|(_, c)| *c).collect();
    assert_eq!(kinds, vec!["version", "header"]);
    assert_eq!(doc.comment_at(13), Some("header"));
    assert_eq!(doc.comment_at(9), None);
}

#[test]
fn bookmarks_are_markers() {
    let mut doc = sample();
    assert!(doc.comments.set(6, 0, "bookmark"));
    assert_eq!(doc.comment_at(6), Some("header"));
    let at_six: Vec<&str> = doc.comments.get_all(6).into_iter().map(|(_, c)| *c).collect();
    assert_eq!(at_six, vec!["bookmark", "header"]);

    // Typing at the bookmark pushes it along with the header.
    let _ = doc.insert(6, "++");
    assert!(doc.comments.find(8, 0).is_some());

    // Erasing its byte removes it.
    let _ = doc.erase(8, 1);
    assert!(doc.comments.find(8, 0).is_none());
    assert!(doc.comments.check_invariants());
}
