/// Aggregated answer statistics for a single tag. Tags are unique within a
/// [`TagSet`]; duplicates in the raw response are merged at parse time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagStat {
    pub tag: String,
    pub score: u64,
    pub answer_count: u64,
}

#[derive(Clone, Debug)]
pub struct TagSet {
    pub user_id: u64,
    pub tags: Vec<TagStat>,
}

impl TagSet {
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    pub fn total_score(&self) -> u64 {
        self.tags.iter().map(|stat| stat.score).sum()
    }

    /// `(min, max)` of the scores, `None` for an empty set.
    pub fn score_extent(&self) -> Option<(u64, u64)> {
        let mut scores = self.tags.iter().map(|stat| stat.score);
        let first = scores.next()?;
        let extent = scores.fold((first, first), |(min, max), score| {
            (min.min(score), max.max(score))
        });
        Some(extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(tag: &str, score: u64) -> TagStat {
        TagStat {
            tag: tag.to_owned(),
            score,
            answer_count: 1,
        }
    }

    #[test]
    fn score_extent_spans_min_and_max() {
        let set = TagSet {
            user_id: 1,
            tags: vec![stat("javascript", 100), stat("css", 10), stat("html", 55)],
        };
        assert_eq!(set.score_extent(), Some((10, 100)));
    }

    #[test]
    fn score_extent_of_empty_set_is_none() {
        let set = TagSet {
            user_id: 1,
            tags: Vec::new(),
        };
        assert_eq!(set.score_extent(), None);
        assert_eq!(set.tag_count(), 0);
    }

    #[test]
    fn total_score_sums_all_tags() {
        let set = TagSet {
            user_id: 1,
            tags: vec![stat("a", 3), stat("b", 4)],
        };
        assert_eq!(set.total_score(), 7);
    }
}
