//! Word translation between the Thai and English label lists.
//!
//! Both decoded word lists share label indices, so a label found at index
//! `i` in one language translates to index `i` in the other.

use std::sync::Arc;

/// Best-effort label translator.
#[derive(Debug, Clone)]
pub struct Translator {
    thai: Arc<Vec<String>>,
    english: Arc<Vec<String>>,
}

impl Translator {
    /// Create a translator over two index-aligned word lists.
    pub fn new(thai: Arc<Vec<String>>, english: Arc<Vec<String>>) -> Self {
        Self { thai, english }
    }

    /// Translate `text` to the other language.
    ///
    /// Text starting with an ASCII letter is looked up in the English list
    /// (case-insensitive containment) and the Thai label is returned; any
    /// other text is looked up in the Thai list and the English label is
    /// returned. Unknown words come back unchanged.
    pub fn translate(&self, text: &str) -> String {
        let Some(first) = text.chars().next() else {
            return String::new();
        };

        let translated = if first.is_ascii_alphabetic() {
            let needle = text.trim().to_lowercase();
            self.english
                .iter()
                .position(|word| word.trim().to_lowercase().contains(&needle))
                .and_then(|index| self.thai.get(index))
        } else {
            self.thai
                .iter()
                .position(|word| word.contains(text))
                .and_then(|index| self.english.get(index))
        };

        match translated {
            Some(word) => word.clone(),
            None => {
                log::debug!("No translation for {text:?}");
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> Translator {
        let thai = ["กระบี่", "คลองท่อม", "ปากเกร็ด", "นนทบุรี"];
        let english = ["Krabi", "Khlong Thom", "Pak Kret", "Nonthaburi"];
        Translator::new(
            Arc::new(thai.iter().map(|w| w.to_string()).collect()),
            Arc::new(english.iter().map(|w| w.to_string()).collect()),
        )
    }

    #[test]
    fn test_english_to_thai() {
        let translator = translator();
        assert_eq!(translator.translate("Pak Kret"), "ปากเกร็ด");
        assert_eq!(translator.translate("nonthaburi"), "นนทบุรี");
        assert_eq!(translator.translate("Khlong"), "คลองท่อม");
    }

    #[test]
    fn test_thai_to_english() {
        let translator = translator();
        assert_eq!(translator.translate("กระบี่"), "Krabi");
        assert_eq!(translator.translate("เกร็ด"), "Pak Kret");
    }

    #[test]
    fn test_unknown_and_empty() {
        let translator = translator();
        assert_eq!(translator.translate("Chiang Mai"), "Chiang Mai");
        assert_eq!(translator.translate("เชียงใหม่"), "เชียงใหม่");
        assert_eq!(translator.translate(""), "");
    }
}
