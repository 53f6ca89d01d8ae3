use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use milestone_dq::config::CatalogConfig;
use milestone_dq::error::AppError;
use milestone_dq::workflows::assessment::{
    ArtifactError, ArtifactReference, ArtifactStore, AssessmentId, AssessmentRecord,
    AssessmentRepository, ChildId, RepositoryError, ScoringConfig,
};
use milestone_dq::workflows::catalog::ItemCatalog;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.assessment_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.assessment_id.clone(), record.clone());
        Ok(record)
    }

    fn attach_artifact(
        &self,
        id: &AssessmentId,
        artifact: ArtifactReference,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.artifact = Some(artifact);
        Ok(())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn latest_final_for_child(
        &self,
        child_id: &ChildId,
    ) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.child.child_id == *child_id && record.artifact.is_some())
            .max_by(|a, b| {
                a.recorded_on
                    .cmp(&b.recorded_on)
                    .then_with(|| a.assessment_id.0.cmp(&b.assessment_id.0))
            })
            .cloned())
    }
}

/// Stand-in for the document renderer: emits deterministic storage keys
/// without producing a file.
#[derive(Default, Clone)]
pub(crate) struct LocalArtifactStore;

impl ArtifactStore for LocalArtifactStore {
    fn generate(&self, record: &AssessmentRecord) -> Result<ArtifactReference, ArtifactError> {
        Ok(ArtifactReference(format!(
            "artifacts/report_{}.pdf",
            record.assessment_id
        )))
    }
}

pub(crate) fn default_scoring_config() -> ScoringConfig {
    ScoringConfig::standard()
}

/// Item bank from the configured CSV export, or the built-in sample so a
/// bare `serve`/`demo` still has items to browse.
pub(crate) fn load_item_catalog(config: &CatalogConfig) -> Result<ItemCatalog, AppError> {
    match &config.item_bank {
        Some(path) => Ok(ItemCatalog::from_path(path)?),
        None => Ok(ItemCatalog::from_reader(Cursor::new(SAMPLE_ITEM_BANK))?),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Built-in bank covering brackets 9 and 10; per-cell item counts match the
/// published divisor table for those brackets.
pub(crate) const SAMPLE_ITEM_BANK: &str = "\
item_id,name,method,pass_criterion,sort,month_age
111,Sits steadily without support,Seat the child on a mat,Sits one minute without toppling,1,9
112,Pulls to stand,Place hands on a rail,Pulls up to standing once,1,9
121,Cruises along furniture,Observe cruising along a low table,Takes three sideways steps,1,10
122,Stands briefly unaided,Stand the child and release support,Holds balance for two seconds,1,10
211,Bangs two cubes together,Offer a cube to each hand,Brings cubes together at midline,2,9
212,Rakes a pellet,Place a pellet on the tray,Rakes it toward the palm,2,9
221,Pincer grasp,Offer a small pellet,Picks it up between thumb and finger,2,10
311,Imitates sounds,Repeat a syllable to the child,Echoes the syllable back,3,9
312,Responds to own name,Call the child from behind,Turns toward the caller,3,9
321,Says mama or dada specifically,Ask the caregiver about babble,Uses one word for a parent,3,10
322,Waves bye-bye on request,Say goodbye and wave,Waves without a model,3,10
411,Uncovers a hidden toy,Hide a toy under a cloth,Lifts the cloth to find it,4,9
412,Pulls string to get ring,Place a ring on a string,Pulls the string deliberately,4,9
421,Looks into a cup for a cube,Drop a cube into a cup,Tips or reaches into the cup,4,10
511,Plays peekaboo,Start a peekaboo exchange,Joins the game with anticipation,5,9
521,Offers a toy to the examiner,Hold out an open hand,Extends a toy toward the hand,5,10
522,Resists toy removal,Gently pull a held toy,Holds on or protests,5,10
";
