//! # Chapter Index
//!
//! Chapters are never stored; they are derived from whatever list the store
//! currently holds and rebuilt wholesale when that list changes.

use std::collections::BTreeMap;

use crate::core::types::Hadith;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterGroup {
    pub id: u32,
    pub title: String,
    pub arabic_title: String,
    pub hadith_count: usize,
    pub first_hadith_number: u32,
}

/// One group per distinct `chapter_id`, ascending by id. Title and first
/// number come from the first hadith seen in each chapter. Hadiths without
/// a chapter are left out.
pub fn chapters_for(hadiths: &[Hadith]) -> Vec<ChapterGroup> {
    let mut groups: BTreeMap<u32, ChapterGroup> = BTreeMap::new();

    for hadith in hadiths {
        let Some(id) = hadith.chapter_id else {
            continue;
        };
        groups
            .entry(id)
            .and_modify(|group| group.hadith_count += 1)
            .or_insert_with(|| ChapterGroup {
                id,
                title: hadith
                    .chapter_title()
                    .filter(|t| !t.trim().is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Chapter {id}")),
                arabic_title: hadith.chapter_arabic_title().unwrap_or_default().to_string(),
                hadith_count: 1,
                first_hadith_number: hadith.number,
            });
    }

    groups.into_values().collect()
}

/// Case-insensitive match on the title, substring match on the Arabic title.
/// A blank query returns every group in its original order.
pub fn filter_chapters(groups: &[ChapterGroup], query: &str) -> Vec<ChapterGroup> {
    let query = query.trim();
    if query.is_empty() {
        return groups.to_vec();
    }
    let needle = query.to_lowercase();
    groups
        .iter()
        .filter(|g| g.title.to_lowercase().contains(&needle) || g.arabic_title.contains(query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{hadith, with_chapter};

    fn ten_in_two_chapters() -> Vec<Hadith> {
        (1..=10)
            .map(|n| {
                let chapter = if n <= 4 { 1 } else { 2 };
                with_chapter(hadith(n), chapter, &format!("Chapter title {chapter}"), "باب")
            })
            .collect()
    }

    #[test]
    fn test_two_chapters_from_ten_hadiths() {
        let groups = chapters_for(&ten_in_two_chapters());
        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].id, groups[0].hadith_count, groups[0].first_hadith_number), (1, 4, 1));
        assert_eq!((groups[1].id, groups[1].hadith_count, groups[1].first_hadith_number), (2, 6, 5));
    }

    #[test]
    fn test_counts_cover_every_chaptered_hadith() {
        let mut hadiths = ten_in_two_chapters();
        hadiths.push(hadith(11)); // no chapter
        hadiths.push(with_chapter(hadith(12), 1, "Chapter title 1", "باب"));

        let groups = chapters_for(&hadiths);
        let with_chapter_count = hadiths.iter().filter(|h| h.chapter_id.is_some()).count();
        assert_eq!(groups.iter().map(|g| g.hadith_count).sum::<usize>(), with_chapter_count);
        assert_eq!(groups[0].hadith_count, 5);
        assert_eq!(groups[0].first_hadith_number, 1);
    }

    #[test]
    fn test_groups_sorted_by_id_regardless_of_input_order() {
        let hadiths = vec![
            with_chapter(hadith(1), 9, "Nine", ""),
            with_chapter(hadith(2), 3, "Three", ""),
        ];
        let ids: Vec<u32> = chapters_for(&hadiths).iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![3, 9]);
    }

    #[test]
    fn test_untitled_chapter_gets_fallback_title() {
        let mut h = hadith(1);
        h.chapter_id = Some(4);
        assert_eq!(chapters_for(&[h])[0].title, "Chapter 4");
    }

    #[test]
    fn test_no_chapters_yields_empty() {
        assert!(chapters_for(&[hadith(1), hadith(2)]).is_empty());
    }

    #[test]
    fn test_filter_chapters() {
        let groups = vec![
            ChapterGroup {
                id: 1,
                title: "Revelation".into(),
                arabic_title: "كتاب بدء الوحى".into(),
                hadith_count: 7,
                first_hadith_number: 1,
            },
            ChapterGroup {
                id: 2,
                title: "Belief".into(),
                arabic_title: "كتاب الإيمان".into(),
                hadith_count: 51,
                first_hadith_number: 8,
            },
        ];
        assert_eq!(filter_chapters(&groups, "").len(), 2);
        assert_eq!(filter_chapters(&groups, "  "), groups);
        assert_eq!(filter_chapters(&groups, "REVEL")[0].id, 1);
        assert_eq!(filter_chapters(&groups, "الإيمان")[0].id, 2);
        assert!(filter_chapters(&groups, "prayer").is_empty());
    }
}
