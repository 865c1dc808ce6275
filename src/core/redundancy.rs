use crate::domain::model::NormalForm;
use serde::{Deserialize, Serialize};

/// 進入某一層級時冗餘分數的調整方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedundancyRule {
    Decrement(u32),
    /// 設為固定值；只會讓分數下降，不會上升
    Absolute(u32),
    /// 依本步驟去重移除的記錄數遞減
    RemovedDuplicates,
}

impl RedundancyRule {
    pub fn apply(self, current: u32, removed_duplicates: usize) -> u32 {
        match self {
            RedundancyRule::Decrement(n) => current.saturating_sub(n),
            RedundancyRule::Absolute(n) => current.min(n),
            RedundancyRule::RemovedDuplicates => {
                current.saturating_sub(u32::try_from(removed_duplicates).unwrap_or(u32::MAX))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRule {
    pub level: u8,
    pub rule: RedundancyRule,
}

/// 層級 → 冗餘調整規則的對照表。未列出的層級不調整分數，5NF 一律歸零。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedundancyPolicy {
    rules: Vec<LevelRule>,
}

impl RedundancyPolicy {
    pub fn new(rules: Vec<LevelRule>) -> Self {
        Self { rules }
    }

    /// 醫療範例的固定遞減值
    pub fn medical() -> Self {
        Self::new(vec![
            LevelRule { level: 1, rule: RedundancyRule::Decrement(5) },
            LevelRule { level: 2, rule: RedundancyRule::Decrement(4) },
            LevelRule { level: 3, rule: RedundancyRule::Decrement(3) },
            LevelRule { level: 4, rule: RedundancyRule::Decrement(2) },
            LevelRule { level: 5, rule: RedundancyRule::Absolute(0) },
        ])
    }

    pub fn rules(&self) -> &[LevelRule] {
        &self.rules
    }

    pub fn rule_for(&self, level: NormalForm) -> Option<RedundancyRule> {
        self.rules
            .iter()
            .find(|r| r.level == level.level())
            .map(|r| r.rule)
    }

    pub fn score_after(&self, level: NormalForm, current: u32, removed_duplicates: usize) -> u32 {
        if level.is_terminal() {
            return 0;
        }
        self.rule_for(level)
            .map_or(current, |rule| rule.apply(current, removed_duplicates))
    }
}

impl Default for RedundancyPolicy {
    fn default() -> Self {
        Self::medical()
    }
}
