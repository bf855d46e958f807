//! Assorted text utilities built on the splitting engine.

use std::collections::BTreeSet;

use crate::split::multisplit::multisplit;
use crate::split::separators;
use crate::split::text::Separators;
use crate::SplitError;

/// Replace every run of separator characters (whitespace by default)
/// with the replacement string (a single space by default). Leading and
/// trailing runs are replaced too:
/// `normalize_whitespace("   a    b   c")` is `" a b c"`.
pub fn normalize_whitespace(
    s: &str,
    separators: Option<Separators<'_, str>>,
    replacement: Option<&str>,
) -> Result<String, SplitError> {
    if s.is_empty() {
        return Ok(String::new());
    }
    let separators =
        separators.unwrap_or(Separators::List(separators::STR_WHITESPACE_WITHOUT_CRLF));
    let replacement = replacement.unwrap_or(" ");
    let words = multisplit(s, separators).segments()?;
    Ok(words.join(replacement))
}

#[derive(Clone, Copy, PartialEq)]
enum TitleState {
    InWord,
    AfterWhitespace,
    AfterWhitespaceThenQuote,
    AfterWhitespaceThenDorO,
    AfterWhitespaceThenDorOThenApostrophe,
}

/// Uppercase the first character of every word, leaving everything else
/// alone. Handles leading apostrophes and quotes (`'Twas`,
/// `He Said 'No'`) and D'/O' contractions (`Peter O'Toole`,
/// `Lord D'Arcy`).
pub fn gently_title(s: &str, apostrophes: Option<&str>, double_quotes: Option<&str>) -> String {
    let apostrophes = apostrophes.unwrap_or(separators::APOSTROPHES);
    let double_quotes = double_quotes.unwrap_or(separators::DOUBLE_QUOTES);

    let mut result = String::with_capacity(s.len());
    let mut state = TitleState::AfterWhitespace;

    for c in s.chars() {
        let is_space = c.is_whitespace() || c == '(';
        let is_apostrophe = apostrophes.contains(c);
        let is_double_quote = double_quotes.contains(c);
        let mut push_upper = false;

        match state {
            TitleState::InWord => {
                if is_space {
                    state = TitleState::AfterWhitespace;
                }
            }
            TitleState::AfterWhitespace => {
                if !is_space {
                    push_upper = true;
                    if is_apostrophe || is_double_quote {
                        state = TitleState::AfterWhitespaceThenQuote;
                    } else if c.to_uppercase().any(|u| u == 'D' || u == 'O') {
                        state = TitleState::AfterWhitespaceThenDorO;
                    } else {
                        state = TitleState::InWord;
                    }
                }
            }
            TitleState::AfterWhitespaceThenQuote => {
                if !(is_apostrophe || is_double_quote) {
                    push_upper = true;
                    state = TitleState::InWord;
                }
            }
            TitleState::AfterWhitespaceThenDorO => {
                if is_apostrophe {
                    state = TitleState::AfterWhitespaceThenDorOThenApostrophe;
                } else {
                    state = TitleState::InWord;
                }
            }
            TitleState::AfterWhitespaceThenDorOThenApostrophe => {
                push_upper = true;
                state = TitleState::InWord;
            }
        }

        if push_upper {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Split a title-case string into its words:
/// `split_title_case("ThisIsATitleCaseString")` yields
/// `["This", "Is", "A", "Title", "Case", "String"]`.
///
/// With `split_allcaps`, a run of uppercase letters also splits before
/// its last letter, which handles single-letter words:
/// `WhenIWasATeapot` becomes `When I Was A Teapot`.
pub fn split_title_case(s: &str, split_allcaps: bool) -> Vec<String> {
    if s.is_empty() {
        return vec![String::new()];
    }
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut word = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_lowercase() {
            word.push(c);
            i += 1;
            while i < chars.len() {
                let c = chars[i];
                if c.is_uppercase() {
                    words.push(std::mem::take(&mut word));
                    break;
                }
                if c.is_lowercase() {
                    word.push(c);
                    i += 1;
                    continue;
                }
                break;
            }
        } else if c.is_uppercase() {
            word.push(c);
            i += 1;
            let mut multiple_uppers = false;
            while i < chars.len() {
                let c = chars[i];
                if c.is_uppercase() {
                    multiple_uppers = split_allcaps;
                    word.push(c);
                    i += 1;
                    continue;
                }
                if c.is_lowercase() && multiple_uppers {
                    let previous = word.pop().expect("word holds at least one character");
                    words.push(std::mem::take(&mut word));
                    word.push(previous);
                }
                break;
            }
        } else {
            word.push(c);
            i += 1;
        }
    }

    if !word.is_empty() {
        words.push(word);
    }
    words
}

/// Apply every split to `s` at once: each split array re-splits the
/// string at its piece boundaries, and the result is split at the union
/// of all boundaries. `combine_splits("abcde", &[&["abcd", "e"],
/// &["a", "bcde"]])` yields `["a", "bcd", "e"]`.
///
/// Every split array must exactly cover `s` (only piece lengths are
/// examined); an array longer than the string is an error.
pub fn combine_splits(s: &str, split_arrays: &[&[&str]]) -> Result<Vec<String>, SplitError> {
    let mut cuts: BTreeSet<usize> = BTreeSet::new();
    for split in split_arrays {
        let mut offset = 0usize;
        for piece in split.iter().filter(|piece| !piece.is_empty()) {
            offset += piece.len();
            if offset > s.len() {
                return Err(SplitError::SplitTooLong);
            }
            if offset < s.len() {
                cuts.insert(offset);
            }
        }
    }

    let mut result = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        result.push(s[start..cut].to_string());
        start = cut;
    }
    if start < s.len() {
        result.push(s[start..].to_string());
    }
    Ok(result)
}

const FIRST_TWENTY: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const FIRST_TWENTY_ORDINAL: [&str; 20] = [
    "zeroth",
    "first",
    "second",
    "third",
    "fourth",
    "fifth",
    "sixth",
    "seventh",
    "eighth",
    "ninth",
    "tenth",
    "eleventh",
    "twelveth",
    "thirteenth",
    "fourteenth",
    "fifteenth",
    "sixteenth",
    "seventeenth",
    "eighteenth",
    "nineteenth",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const QUANTITIES: [(i128, &str); 13] = [
    (10i128.pow(36), " undecillion"),
    (10i128.pow(33), " decillion"),
    (10i128.pow(30), " nonillion"),
    (10i128.pow(27), " octillion"),
    (10i128.pow(24), " septillion"),
    (10i128.pow(21), " sextillion"),
    (10i128.pow(18), " quintillion"),
    (10i128.pow(15), " quadrillion"),
    (10i128.pow(12), " trillion"),
    (10i128.pow(9), " billion"),
    (10i128.pow(6), " million"),
    (10i128.pow(3), " thousand"),
    (10i128.pow(2), " hundred"),
];

/// Convert an integer into the equivalent English string:
/// `int_to_words(35)` is `"thirty-five"`.
///
/// When `flowery` is true (the conventional rendering), commas and the
/// word "and" appear where English expects them. When `ordinal` is
/// true, the result is the positional form (`int_to_words(1)` is
/// `"one"`, ordinal `"first"`).
pub fn int_to_words(i: i64, flowery: bool, ordinal: bool) -> String {
    let negative = i < 0;
    let mut i = (i as i128).abs();

    let first_twenty: &[&str; 20] = if ordinal {
        &FIRST_TWENTY_ORDINAL
    } else {
        &FIRST_TWENTY
    };

    let mut strings: Vec<String> = Vec::new();
    let mut spacer = "";

    if i >= 100 {
        for (threshold, english) in QUANTITIES {
            if i >= threshold {
                let upper = i / threshold;
                i %= threshold;
                strings.push(spacer.to_string());
                strings.push(int_to_words(upper as i64, flowery, false));
                strings.push(english.to_string());
                spacer = if flowery { ", " } else { " " };
            }
        }
    }

    if !strings.is_empty() {
        spacer = if flowery { " and " } else { " " };
    }

    if i >= 20 {
        let t = (i / 10) as usize;
        strings.push(spacer.to_string());
        strings.push(TENS[t].to_string());
        spacer = "-";
        i %= 10;
    }

    if i != 0 || strings.is_empty() {
        strings.push(spacer.to_string());
        strings.push(first_twenty[i as usize].to_string());
    } else if ordinal {
        if let Some(last) = strings.last_mut() {
            if last.ends_with('y') {
                last.pop();
                last.push_str("ie");
            }
        }
        strings.push("th".to_string());
    }

    if negative {
        strings.insert(0, "negative ".to_string());
    }

    strings.concat()
}
