// One-shot CSV bulk load. Runs offline before the server starts serving;
// it is the only writer in the system.
//
// Policy per source row: empty fields become NULL, an id that is already
// stored is skipped (reported, never overwritten), a row that violates a
// constraint is skipped with its own failure rolled back, and the batch
// continues. A missing or unreadable source file skips that source only.

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::db::{Database, Item, ParentRef, Skill};

pub const FAMILIES_CSV: &str = "monster_families.csv";
pub const MONSTERS_CSV: &str = "monsters.csv";
pub const SKILLS_CSV: &str = "skills.csv";
pub const SKILL_LINKS_CSV: &str = "monster_skill_links.csv";
pub const SKILL_COMBINES_CSV: &str = "skill_combines.csv";
pub const BREEDING_CSV: &str = "breeding_links.csv";
pub const ITEMS_CSV: &str = "items.csv";

/// Per-source tally. `skipped` counts duplicate identifiers, `failed`
/// counts rows rejected for malformed content or constraint violations.
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceReport {
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub sources: Vec<(&'static str, SourceReport)>,
}

impl LoadReport {
    pub fn source(&self, name: &str) -> Option<&SourceReport> {
        self.sources
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, r)| r)
    }

    pub fn total_inserted(&self) -> usize {
        self.sources.iter().map(|(_, r)| r.inserted).sum()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, r) in &self.sources {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(
                f,
                "{name}: {} inserted, {} skipped, {} failed",
                r.inserted, r.skipped, r.failed
            )?;
        }
        Ok(())
    }
}

// ── Source row shapes ─────────────────────────────────────────────────
//
// Field names double as CSV headers. Empty fields deserialize to None.

#[derive(Debug, Deserialize)]
struct FamilyRow {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct MonsterRow {
    id: i64,
    display_name: String,
    legacy_name: String,
    description: String,
    family_id: i64,
}

#[derive(Debug, Deserialize)]
struct SkillRow {
    id: i64,
    category: String,
    family_type: String,
    display_name: Option<String>,
    legacy_name: String,
    description: String,
    mp_cost: i64,
    required_level: i64,
    required_hp: Option<i64>,
    required_mp: Option<i64>,
    required_attack: Option<i64>,
    required_defense: Option<i64>,
    required_speed: Option<i64>,
    required_intelligence: Option<i64>,
    upgrade_to_id: Option<i64>,
    upgrade_from_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SkillLinkRow {
    id: Option<i64>,
    monster_id: i64,
    skill_id: i64,
}

#[derive(Debug, Deserialize)]
struct SkillCombineRow {
    id: Option<i64>,
    combo_skill_id: i64,
    needed_skill_id: i64,
}

#[derive(Debug, Deserialize)]
struct BreedingRow {
    id: Option<i64>,
    child_id: i64,
    pedigree_id: Option<i64>,
    parent2_id: Option<i64>,
    pedigree_family_id: Option<i64>,
    family2_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ItemRow {
    id: i64,
    name: String,
    category: String,
    description: String,
    price: Option<i64>,
    sell_price: Option<i64>,
    sell_location: String,
}

impl From<SkillRow> for Skill {
    fn from(row: SkillRow) -> Self {
        Skill {
            id: row.id,
            category: row.category,
            family_type: row.family_type,
            display_name: row.display_name,
            legacy_name: row.legacy_name,
            description: row.description,
            mp_cost: row.mp_cost,
            required_level: row.required_level,
            required_hp: row.required_hp,
            required_mp: row.required_mp,
            required_attack: row.required_attack,
            required_defense: row.required_defense,
            required_speed: row.required_speed,
            required_intelligence: row.required_intelligence,
            upgrade_to_id: row.upgrade_to_id,
            upgrade_from_id: row.upgrade_from_id,
        }
    }
}

/// Read every deserializable row of a source. Returns None when the file
/// itself cannot be opened or read; rows that fail to deserialize are
/// counted against the report and the rest of the source still loads.
fn read_rows<T: DeserializeOwned>(path: &Path, report: &mut SourceReport) -> Option<Vec<T>> {
    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(e) => {
            tracing::warn!("skipping source {}: {e}", path.display());
            return None;
        }
    };
    let mut rows = Vec::new();
    for record in reader.deserialize::<T>() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                tracing::warn!("{}: malformed row skipped: {e}", path.display());
                report.failed += 1;
            }
        }
    }
    Some(rows)
}

fn tally(report: &mut SourceReport, source: &str, id: i64, outcome: Result<bool, sqlx::Error>) {
    match outcome {
        Ok(true) => report.inserted += 1,
        Ok(false) => {
            tracing::warn!("{source}: id {id} already present, skipped");
            report.skipped += 1;
        }
        Err(e) => {
            tracing::warn!("{source}: row {id} rejected: {e}");
            report.failed += 1;
        }
    }
}

async fn load_families(db: &Database, path: &Path) -> SourceReport {
    let mut report = SourceReport::default();
    let Some(rows) = read_rows::<FamilyRow>(path, &mut report) else {
        return report;
    };
    for row in rows {
        let outcome = db.insert_family(row.id, &row.name).await;
        tally(&mut report, FAMILIES_CSV, row.id, outcome);
    }
    report
}

async fn load_items(db: &Database, path: &Path) -> SourceReport {
    let mut report = SourceReport::default();
    let Some(rows) = read_rows::<ItemRow>(path, &mut report) else {
        return report;
    };
    for row in rows {
        let item = Item {
            id: row.id,
            name: row.name,
            category: row.category,
            description: row.description,
            price: row.price,
            sell_price: row.sell_price,
            sell_location: row.sell_location,
        };
        let outcome = db.insert_item(&item).await;
        tally(&mut report, ITEMS_CSV, item.id, outcome);
    }
    report
}

/// Skills load in two passes: rows first with NULL upgrade links, then a
/// patch pass once every skill id exists, so chains may reference forwards.
async fn load_skills(db: &Database, path: &Path) -> SourceReport {
    let mut report = SourceReport::default();
    let Some(rows) = read_rows::<SkillRow>(path, &mut report) else {
        return report;
    };
    let skills: Vec<Skill> = rows.into_iter().map(Skill::from).collect();

    // Only rows whose insert landed get their links patched; a duplicate
    // row must not overwrite the links of the row that won.
    let mut landed = vec![false; skills.len()];
    for (i, skill) in skills.iter().enumerate() {
        let outcome = db.insert_skill(skill).await;
        landed[i] = matches!(outcome, Ok(true));
        tally(&mut report, SKILLS_CSV, skill.id, outcome);
    }

    for (skill, landed) in skills.iter().zip(landed) {
        if !landed || (skill.upgrade_to_id.is_none() && skill.upgrade_from_id.is_none()) {
            continue;
        }
        match db
            .set_skill_upgrades(skill.id, skill.upgrade_to_id, skill.upgrade_from_id)
            .await
        {
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("{SKILLS_CSV}: upgrade links for {} rejected: {e}", skill.id);
                // The row was tallied as inserted above; its links were
                // rejected, so it counts as failed instead. The base row
                // stays stored with NULL links.
                report.inserted -= 1;
                report.failed += 1;
            }
        }
    }
    report
}

async fn load_monsters(db: &Database, path: &Path) -> SourceReport {
    let mut report = SourceReport::default();
    let Some(rows) = read_rows::<MonsterRow>(path, &mut report) else {
        return report;
    };
    for row in rows {
        let outcome = db
            .insert_monster(
                row.id,
                &row.display_name,
                &row.legacy_name,
                &row.description,
                row.family_id,
            )
            .await;
        tally(&mut report, MONSTERS_CSV, row.id, outcome);
    }
    report
}

async fn load_skill_links(db: &Database, path: &Path) -> SourceReport {
    let mut report = SourceReport::default();
    let Some(rows) = read_rows::<SkillLinkRow>(path, &mut report) else {
        return report;
    };
    for row in rows {
        let outcome = db
            .insert_monster_skill_link(row.id, row.monster_id, row.skill_id)
            .await;
        tally(&mut report, SKILL_LINKS_CSV, row.id.unwrap_or(-1), outcome);
    }
    report
}

async fn load_skill_combines(db: &Database, path: &Path) -> SourceReport {
    let mut report = SourceReport::default();
    let Some(rows) = read_rows::<SkillCombineRow>(path, &mut report) else {
        return report;
    };
    for row in rows {
        let outcome = db
            .insert_skill_combine(row.id, row.combo_skill_id, row.needed_skill_id)
            .await;
        tally(
            &mut report,
            SKILL_COMBINES_CSV,
            row.id.unwrap_or(-1),
            outcome,
        );
    }
    report
}

async fn load_breeding(db: &Database, path: &Path) -> SourceReport {
    let mut report = SourceReport::default();
    let Some(rows) = read_rows::<BreedingRow>(path, &mut report) else {
        return report;
    };
    for row in rows {
        let pedigree = ParentRef::from_columns(row.pedigree_id, row.pedigree_family_id);
        let partner = ParentRef::from_columns(row.parent2_id, row.family2_id);
        let (pedigree, partner) = match (pedigree, partner) {
            (Ok(p), Ok(q)) => (p, q),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(
                    "{BREEDING_CSV}: row for child {} rejected: {e}",
                    row.child_id
                );
                report.failed += 1;
                continue;
            }
        };
        let outcome = db
            .insert_breeding_link(row.id, row.child_id, pedigree, partner)
            .await;
        tally(&mut report, BREEDING_CSV, row.id.unwrap_or(-1), outcome);
    }
    report
}

/// Load every CSV source in `dir`, in entity-dependency order: referenced
/// entities before their dependents, skill upgrade links patched after all
/// skills exist.
pub async fn load_dir(db: &Database, dir: &Path) -> LoadReport {
    let mut report = LoadReport::default();

    let families = load_families(db, &dir.join(FAMILIES_CSV)).await;
    report.sources.push((FAMILIES_CSV, families));

    let items = load_items(db, &dir.join(ITEMS_CSV)).await;
    report.sources.push((ITEMS_CSV, items));

    let skills = load_skills(db, &dir.join(SKILLS_CSV)).await;
    report.sources.push((SKILLS_CSV, skills));

    let monsters = load_monsters(db, &dir.join(MONSTERS_CSV)).await;
    report.sources.push((MONSTERS_CSV, monsters));

    let links = load_skill_links(db, &dir.join(SKILL_LINKS_CSV)).await;
    report.sources.push((SKILL_LINKS_CSV, links));

    let combines = load_skill_combines(db, &dir.join(SKILL_COMBINES_CSV)).await;
    report.sources.push((SKILL_COMBINES_CSV, combines));

    let breeding = load_breeding(db, &dir.join(BREEDING_CSV)).await;
    report.sources.push((BREEDING_CSV, breeding));

    report
}
