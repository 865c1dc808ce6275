use crate::config::StepperConfig;
use crate::core::catalog::SchemaCatalog;
use crate::core::decompose::{deduplicate, multi_valued_fields, split_paired_values, TaggingDecomposer};
use crate::core::inference::infer_foreign_key_candidates;
use crate::core::redundancy::RedundancyPolicy;
use crate::core::sample::medical_dataset;
use crate::domain::model::{Dataset, NormalForm, StepResult};
use crate::domain::ports::Decomposer;
use crate::utils::error::{NormalizeError, Result};
use crate::utils::validation::Validate;
use std::collections::BTreeSet;

const WELCOME: &str = "Welcome! This medical dataset is chaotic with redundancies. \
    Advance to begin the journey to 5NF.";
const RESET: &str = "Reset! Ready to normalize again.";

fn narration_for(level: NormalForm) -> &'static str {
    match level.level() {
        1 => "1NF: Atomic values only. Split multi-valued treatments into separate records.",
        2 => "2NF: No partial dependencies. Split into Patients and Appointments tables.",
        3 => "3NF: No transitive dependencies. Extract Hospitals table.",
        4 => "4NF: No multi-valued dependencies. Separate Doctor-Treatment associations.",
        5 => "5NF: No join dependencies. Final decomposition into lossless tables.",
        _ => WELCOME,
    }
}

/// reset 時要回到的起點：範例資料或最近一次 load 的資料
#[derive(Debug, Clone)]
struct Baseline {
    dataset: Dataset,
    redundancy: u32,
    candidates: BTreeSet<String>,
}

/// 正規化步進器：一個明確的會話物件，持有目前層級、資料集與冗餘分數。
///
/// 所有事件（`advance` / `reset` / `load`）都以 `&mut self` 處理，
/// 同一時間只能有一個寫入者；需要共享時由呼叫端自行序列化。
pub struct Stepper<D: Decomposer = TaggingDecomposer> {
    config: StepperConfig,
    policy: RedundancyPolicy,
    catalog: SchemaCatalog,
    decomposer: D,
    baseline: Baseline,
    level: NormalForm,
    dataset: Dataset,
    redundancy: u32,
    last: StepResult,
}

impl Stepper<TaggingDecomposer> {
    pub fn new(config: StepperConfig) -> Result<Self> {
        Self::with_parts(config, SchemaCatalog::medical(), TaggingDecomposer)
    }
}

impl<D: Decomposer> Stepper<D> {
    pub fn with_parts(config: StepperConfig, catalog: SchemaCatalog, decomposer: D) -> Result<Self> {
        config.validate()?;

        let baseline = Baseline {
            dataset: medical_dataset(),
            redundancy: config.session.initial_redundancy,
            candidates: BTreeSet::new(),
        };
        let last = StepResult {
            level: NormalForm::UNNORMALIZED,
            narration: WELCOME.to_string(),
            dataset: baseline.dataset.clone(),
            redundancy: baseline.redundancy,
            tables: Vec::new(),
            relationships: Vec::new(),
            foreign_key_candidates: BTreeSet::new(),
        };

        Ok(Self {
            policy: config.redundancy_policy(),
            config,
            catalog,
            decomposer,
            level: NormalForm::UNNORMALIZED,
            dataset: baseline.dataset.clone(),
            redundancy: baseline.redundancy,
            baseline,
            last,
        })
    }

    pub fn level(&self) -> NormalForm {
        self.level
    }

    pub fn redundancy(&self) -> u32 {
        self.redundancy
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// 最近一次交給呈現層的結果
    pub fn current(&self) -> &StepResult {
        &self.last
    }

    /// 前進一個層級。已在 5NF 時不做任何事，回傳上一次的結果。
    pub fn advance(&mut self) -> StepResult {
        let Some(next) = self.level.next() else {
            tracing::warn!("⏸️ Already at {}, advance ignored", self.level);
            return self.last.clone();
        };

        let (dataset, removed) = if next.level() == 1 {
            self.atomize()
        } else {
            let tables = self.catalog.tables_for_level(next);
            (self.decomposer.project(&self.dataset, &tables), 0)
        };

        let before = self.redundancy;
        self.redundancy = self.policy.score_after(next, self.redundancy, removed);
        self.level = next;
        self.dataset = dataset;

        tracing::info!(
            "➡️ {} reached: {} records, redundancy {} -> {}",
            next,
            self.dataset.len(),
            before,
            self.redundancy
        );

        self.last = self.snapshot(narration_for(next).to_string());
        self.last.clone()
    }

    /// 與 `advance` 相同，但在 5NF 時回報 `InvalidTransition`
    pub fn try_advance(&mut self) -> Result<StepResult> {
        if self.level.is_terminal() {
            return Err(NormalizeError::InvalidTransition {
                level: self.level.to_string(),
            });
        }
        Ok(self.advance())
    }

    /// 只接受目前層級或下一層級，其他請求一律視為無效操作
    pub fn request_level(&mut self, target: u8) -> StepResult {
        let current = self.level.level();
        if target == current.saturating_add(1) && !self.level.is_terminal() {
            self.advance()
        } else {
            if target != current {
                tracing::debug!("Ignoring request for level {} while at {}", target, self.level);
            }
            self.last.clone()
        }
    }

    pub fn reset(&mut self) -> StepResult {
        self.level = NormalForm::UNNORMALIZED;
        self.dataset = self.baseline.dataset.clone();
        self.redundancy = self.baseline.redundancy;

        tracing::info!("🔄 Session reset to {} records", self.dataset.len());
        self.last = self.snapshot(RESET.to_string());
        self.last.clone()
    }

    /// 以上傳的資料集取代目前資料集並回到未正規化狀態。
    /// 欄位不一致時拒絕載入，會話狀態保持不變。
    pub fn load(&mut self, dataset: Dataset) -> Result<StepResult> {
        if let Err(e) = dataset.validate() {
            tracing::warn!("❌ Rejected dataset: {}", e);
            return Err(e);
        }

        let candidates =
            infer_foreign_key_candidates(&dataset, self.config.inference.distinct_threshold);
        let redundancy = u32::try_from(dataset.duplicate_count()).unwrap_or(u32::MAX);

        let narration = if candidates.is_empty() {
            format!(
                "Loaded {} records with {} fields. No foreign-key candidates found.",
                dataset.len(),
                dataset.fields.len()
            )
        } else {
            format!(
                "Loaded {} records with {} fields. Foreign-key candidates: {}.",
                dataset.len(),
                dataset.fields.len(),
                candidates.iter().cloned().collect::<Vec<_>>().join(", ")
            )
        };

        tracing::info!(
            "📥 Loaded {} records, {} duplicates, {} foreign-key candidates",
            dataset.len(),
            redundancy,
            candidates.len()
        );

        self.baseline = Baseline {
            dataset,
            redundancy,
            candidates,
        };
        self.level = NormalForm::UNNORMALIZED;
        self.dataset = self.baseline.dataset.clone();
        self.redundancy = redundancy;
        self.last = self.snapshot(narration);
        Ok(self.last.clone())
    }

    /// 顯示呼叫端提供的錯誤訊息（例如上傳解析失敗），不改變會話狀態
    pub fn report_failure(&self, message: &str) -> StepResult {
        StepResult {
            narration: format!("Error loading dataset: {}", message),
            ..self.last.clone()
        }
    }

    /// 1NF：同步拆分每組多值欄位後去重
    fn atomize(&self) -> (Dataset, usize) {
        let delimiter = self.config.session.delimiter.as_str();
        let mut groups: Vec<Vec<String>> = self
            .config
            .session
            .multi_valued_groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .filter(|f| self.dataset.has_field(f))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .filter(|group| !group.is_empty())
            .collect();

        if self.config.session.detect_multi_valued {
            let grouped: BTreeSet<String> = groups.iter().flatten().cloned().collect();
            groups.extend(
                multi_valued_fields(&self.dataset, delimiter)
                    .into_iter()
                    .filter(|f| !grouped.contains(f))
                    .map(|f| vec![f]),
            );
        }

        let split = groups.iter().fold(self.dataset.clone(), |acc, group| {
            split_paired_values(&acc, group, delimiter)
        });
        deduplicate(&split)
    }

    fn snapshot(&self, narration: String) -> StepResult {
        let (tables, relationships) = if self.level.level() >= 2 {
            let active = self.catalog.tables_for_level(self.level);
            (
                self.catalog.schemas_for(&active),
                self.catalog.relationships_among(&active),
            )
        } else {
            (Vec::new(), Vec::new())
        };

        StepResult {
            level: self.level,
            narration,
            dataset: self.dataset.clone(),
            redundancy: self.redundancy,
            tables,
            relationships,
            foreign_key_candidates: self.baseline.candidates.clone(),
        }
    }
}
