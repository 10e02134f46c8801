//! Pinyin initials for initials-based search over Chinese process names
//!
//! Han characters with several readings (行 xing/hang, 重 zhong/chong) keep
//! every candidate initial, so "yh" finds 银行 and "cq" finds 重庆.

use pinyin::{ToPinyin, ToPinyinMulti};

/// Candidate initials for each position of `text`, uppercase.
///
/// Each Han character contributes one slot holding the first letter of every
/// reading, default reading first. Each run of other non-whitespace
/// characters contributes one slot with its first character.
pub fn initial_candidates(text: &str) -> Vec<Vec<char>> {
    let mut slots: Vec<Vec<char>> = Vec::new();
    let mut in_run = false;

    for c in text.chars() {
        if let Some(reading) = c.to_pinyin() {
            let mut slot: Vec<char> = reading.first_letter().to_uppercase().chars().collect();
            if let Some(readings) = c.to_pinyin_multi() {
                for alt in readings {
                    for letter in alt.first_letter().to_uppercase().chars() {
                        if !slot.contains(&letter) {
                            slot.push(letter);
                        }
                    }
                }
            }
            slots.push(slot);
            in_run = false;
        } else if c.is_whitespace() {
            in_run = false;
        } else {
            if !in_run {
                slots.push(c.to_uppercase().collect());
            }
            in_run = true;
        }
    }

    slots
}

/// Uppercase initials of `text` using each character's default reading,
/// so `"微信 helper.exe"` yields `"WXH"`.
pub fn phonetic_initials(text: &str) -> String {
    initial_candidates(text)
        .into_iter()
        .filter_map(|slot| slot.first().copied())
        .collect()
}

/// Whether `needle` is a contiguous run of initials of `text` under any
/// choice of reading. Case-insensitive; an empty needle always matches.
pub fn initials_contain(text: &str, needle: &str) -> bool {
    let needle: Vec<char> = needle.chars().flat_map(char::to_uppercase).collect();
    if needle.is_empty() {
        return true;
    }

    let slots = initial_candidates(text);
    if needle.len() > slots.len() {
        return false;
    }

    slots.windows(needle.len()).any(|window| {
        window
            .iter()
            .zip(&needle)
            .all(|(slot, wanted)| slot.contains(wanted))
    })
}
