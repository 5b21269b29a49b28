// Database access layer (SQLite via sqlx).
//
// One table per entity. The loader is the only writer; every read endpoint
// goes through the query methods below, which never mutate state.

pub mod enums;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MonsterFamily {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Monster {
    pub id: i64,
    pub display_name: String,
    pub legacy_name: String,
    pub description: String,
    pub family_id: i64,
}

/// A skill as stored. `upgrade_to_id`/`upgrade_from_id` form the upgrade
/// chain; the pair is conceptually bidirectional but stored as two
/// independently-nullable self-references, maintained by data entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Skill {
    pub id: i64,
    pub category: String,
    pub family_type: String,
    pub display_name: Option<String>,
    pub legacy_name: String,
    pub description: String,
    pub mp_cost: i64,
    pub required_level: i64,
    pub required_hp: Option<i64>,
    pub required_mp: Option<i64>,
    pub required_attack: Option<i64>,
    pub required_defense: Option<i64>,
    pub required_speed: Option<i64>,
    pub required_intelligence: Option<i64>,
    pub upgrade_to_id: Option<i64>,
    pub upgrade_from_id: Option<i64>,
}

/// One prerequisite edge of a combo skill. The full prerequisite set for a
/// combo skill is the set of `needed_skill_id` values across all rows
/// sharing its `combo_skill_id`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SkillCombine {
    pub id: i64,
    pub combo_skill_id: i64,
    pub needed_skill_id: i64,
}

/// A breeding rule. Each parent slot is designated either by a specific
/// monster or by a family, never both and never neither; inserts go through
/// [`ParentRef`] so malformed rows cannot reach storage.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BreedingLink {
    pub id: i64,
    pub child_id: i64,
    pub pedigree_id: Option<i64>,
    pub parent2_id: Option<i64>,
    pub pedigree_family_id: Option<i64>,
    pub family2_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: Option<i64>,
    pub sell_price: Option<i64>,
    pub sell_location: String,
}

/// Tagged parent designation for a breeding rule slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    Monster(i64),
    Family(i64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BreedingShapeError {
    #[error("parent slot designates both a specific monster and a family")]
    BothSet,
    #[error("parent slot designates neither a monster nor a family")]
    Empty,
}

impl ParentRef {
    /// Build a designation from the two nullable columns of a source row.
    /// Exactly one of the pair must be set.
    pub fn from_columns(
        monster_id: Option<i64>,
        family_id: Option<i64>,
    ) -> Result<Self, BreedingShapeError> {
        match (monster_id, family_id) {
            (Some(m), None) => Ok(ParentRef::Monster(m)),
            (None, Some(f)) => Ok(ParentRef::Family(f)),
            (Some(_), Some(_)) => Err(BreedingShapeError::BothSet),
            (None, None) => Err(BreedingShapeError::Empty),
        }
    }

    fn monster_id(self) -> Option<i64> {
        match self {
            ParentRef::Monster(id) => Some(id),
            ParentRef::Family(_) => None,
        }
    }

    fn family_id(self) -> Option<i64> {
        match self {
            ParentRef::Monster(_) => None,
            ParentRef::Family(id) => Some(id),
        }
    }
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        // Each pooled in-memory SQLite connection owns a separate database,
        // so memory URLs must stay on a single connection.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS monster_families (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS monsters (
                id INTEGER PRIMARY KEY,
                display_name TEXT NOT NULL,
                legacy_name TEXT NOT NULL,
                description TEXT NOT NULL,
                family_id INTEGER NOT NULL REFERENCES monster_families(id)
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS skills (
                id INTEGER PRIMARY KEY,
                category TEXT NOT NULL,
                family_type TEXT NOT NULL,
                display_name TEXT,
                legacy_name TEXT NOT NULL,
                description TEXT NOT NULL,
                mp_cost INTEGER NOT NULL,
                required_level INTEGER NOT NULL,
                required_hp INTEGER,
                required_mp INTEGER,
                required_attack INTEGER,
                required_defense INTEGER,
                required_speed INTEGER,
                required_intelligence INTEGER,
                upgrade_to_id INTEGER REFERENCES skills(id),
                upgrade_from_id INTEGER REFERENCES skills(id)
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS monster_skill_links (
                id INTEGER PRIMARY KEY,
                monster_id INTEGER NOT NULL REFERENCES monsters(id),
                skill_id INTEGER NOT NULL REFERENCES skills(id)
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS skill_combines (
                id INTEGER PRIMARY KEY,
                combo_skill_id INTEGER NOT NULL REFERENCES skills(id),
                needed_skill_id INTEGER NOT NULL REFERENCES skills(id)
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS breeding_links (
                id INTEGER PRIMARY KEY,
                child_id INTEGER NOT NULL REFERENCES monsters(id),
                pedigree_id INTEGER REFERENCES monsters(id),
                parent2_id INTEGER REFERENCES monsters(id),
                pedigree_family_id INTEGER REFERENCES monster_families(id),
                family2_id INTEGER REFERENCES monster_families(id)
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                price INTEGER,
                sell_price INTEGER,
                sell_location TEXT NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ── Inserts (loader and tests only; the HTTP surface is read-only) ──
    //
    // Every insert is idempotent by identifier: an id that already exists
    // leaves the stored row untouched and returns Ok(false). A NULL id lets
    // SQLite assign the next rowid.

    pub async fn insert_family(&self, id: i64, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO monster_families (id, name) VALUES (?, ?) ON CONFLICT(id) DO NOTHING",
        )
        .bind(id)
        .bind(name)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_monster(
        &self,
        id: i64,
        display_name: &str,
        legacy_name: &str,
        description: &str,
        family_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO monsters (id, display_name, legacy_name, description, family_id) \
             VALUES (?, ?, ?, ?, ?) ON CONFLICT(id) DO NOTHING",
        )
        .bind(id)
        .bind(display_name)
        .bind(legacy_name)
        .bind(description)
        .bind(family_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert a skill row with NULL upgrade links. The chain may point at
    /// rows that do not exist yet, so the self-references are patched with
    /// [`Database::set_skill_upgrades`] once all skills are in.
    pub async fn insert_skill(&self, skill: &Skill) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO skills (id, category, family_type, display_name, legacy_name, description, \
                                 mp_cost, required_level, required_hp, required_mp, required_attack, \
                                 required_defense, required_speed, required_intelligence) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) ON CONFLICT(id) DO NOTHING",
        )
        .bind(skill.id)
        .bind(&skill.category)
        .bind(&skill.family_type)
        .bind(&skill.display_name)
        .bind(&skill.legacy_name)
        .bind(&skill.description)
        .bind(skill.mp_cost)
        .bind(skill.required_level)
        .bind(skill.required_hp)
        .bind(skill.required_mp)
        .bind(skill.required_attack)
        .bind(skill.required_defense)
        .bind(skill.required_speed)
        .bind(skill.required_intelligence)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Second pass of the skill load: point an existing skill at its upgrade
    /// neighbours. Returns Ok(false) if the skill id does not exist.
    pub async fn set_skill_upgrades(
        &self,
        id: i64,
        upgrade_to_id: Option<i64>,
        upgrade_from_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE skills SET upgrade_to_id = ?, upgrade_from_id = ? WHERE id = ?")
                .bind(upgrade_to_id)
                .bind(upgrade_from_id)
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_monster_skill_link(
        &self,
        id: Option<i64>,
        monster_id: i64,
        skill_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO monster_skill_links (id, monster_id, skill_id) VALUES (?, ?, ?) \
             ON CONFLICT(id) DO NOTHING",
        )
        .bind(id)
        .bind(monster_id)
        .bind(skill_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_skill_combine(
        &self,
        id: Option<i64>,
        combo_skill_id: i64,
        needed_skill_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO skill_combines (id, combo_skill_id, needed_skill_id) VALUES (?, ?, ?) \
             ON CONFLICT(id) DO NOTHING",
        )
        .bind(id)
        .bind(combo_skill_id)
        .bind(needed_skill_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_breeding_link(
        &self,
        id: Option<i64>,
        child_id: i64,
        pedigree: ParentRef,
        partner: ParentRef,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO breeding_links (id, child_id, pedigree_id, parent2_id, pedigree_family_id, family2_id) \
             VALUES (?, ?, ?, ?, ?, ?) ON CONFLICT(id) DO NOTHING",
        )
        .bind(id)
        .bind(child_id)
        .bind(pedigree.monster_id())
        .bind(partner.monster_id())
        .bind(pedigree.family_id())
        .bind(partner.family_id())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_item(&self, item: &Item) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO items (id, name, category, description, price, sell_price, sell_location) \
             VALUES (?, ?, ?, ?, ?, ?, ?) ON CONFLICT(id) DO NOTHING",
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.sell_price)
        .bind(&item.sell_location)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Families ──────────────────────────────────────────────────────

    pub async fn list_families(&self) -> Result<Vec<MonsterFamily>, sqlx::Error> {
        sqlx::query_as::<_, MonsterFamily>("SELECT id, name FROM monster_families ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get_family(&self, id: i64) -> Result<Option<MonsterFamily>, sqlx::Error> {
        sqlx::query_as::<_, MonsterFamily>("SELECT id, name FROM monster_families WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    // ── Monsters ──────────────────────────────────────────────────────

    pub async fn list_monsters(&self, family_id: Option<i64>) -> Result<Vec<Monster>, sqlx::Error> {
        sqlx::query_as::<_, Monster>(
            "SELECT id, display_name, legacy_name, description, family_id FROM monsters \
             WHERE (? IS NULL OR family_id = ?) ORDER BY id",
        )
        .bind(family_id)
        .bind(family_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_monster(&self, id: i64) -> Result<Option<Monster>, sqlx::Error> {
        sqlx::query_as::<_, Monster>(
            "SELECT id, display_name, legacy_name, description, family_id FROM monsters WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Skills a monster knows, in the order the links were recorded. Link
    /// insertion order is the documented observable order.
    pub async fn skills_for_monster(&self, monster_id: i64) -> Result<Vec<Skill>, sqlx::Error> {
        sqlx::query_as::<_, Skill>(
            "SELECT s.id, s.category, s.family_type, s.display_name, s.legacy_name, s.description, \
                    s.mp_cost, s.required_level, s.required_hp, s.required_mp, s.required_attack, \
                    s.required_defense, s.required_speed, s.required_intelligence, \
                    s.upgrade_to_id, s.upgrade_from_id \
             FROM skills s \
             JOIN monster_skill_links l ON l.skill_id = s.id \
             WHERE l.monster_id = ? ORDER BY l.id",
        )
        .bind(monster_id)
        .fetch_all(&self.pool)
        .await
    }

    // ── Skills ────────────────────────────────────────────────────────

    /// Both filters optional; when both are given the result is the
    /// intersection. Values are matched exactly against the stored text.
    pub async fn list_skills(
        &self,
        category: Option<&str>,
        family_type: Option<&str>,
    ) -> Result<Vec<Skill>, sqlx::Error> {
        sqlx::query_as::<_, Skill>(
            "SELECT id, category, family_type, display_name, legacy_name, description, mp_cost, \
                    required_level, required_hp, required_mp, required_attack, required_defense, \
                    required_speed, required_intelligence, upgrade_to_id, upgrade_from_id \
             FROM skills \
             WHERE (? IS NULL OR category = ?) AND (? IS NULL OR family_type = ?) \
             ORDER BY id",
        )
        .bind(category)
        .bind(category)
        .bind(family_type)
        .bind(family_type)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_skill(&self, id: i64) -> Result<Option<Skill>, sqlx::Error> {
        sqlx::query_as::<_, Skill>(
            "SELECT id, category, family_type, display_name, legacy_name, description, mp_cost, \
                    required_level, required_hp, required_mp, required_attack, required_defense, \
                    required_speed, required_intelligence, upgrade_to_id, upgrade_from_id \
             FROM skills WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Prerequisite edges of a combo skill. An empty result means the skill
    /// is learned normally; it is not an error.
    pub async fn combines_for_skill(
        &self,
        combo_skill_id: i64,
    ) -> Result<Vec<SkillCombine>, sqlx::Error> {
        sqlx::query_as::<_, SkillCombine>(
            "SELECT id, combo_skill_id, needed_skill_id FROM skill_combines \
             WHERE combo_skill_id = ? ORDER BY id",
        )
        .bind(combo_skill_id)
        .fetch_all(&self.pool)
        .await
    }

    // ── Items ─────────────────────────────────────────────────────────

    pub async fn list_items(
        &self,
        category: Option<&str>,
        sell_location: Option<&str>,
    ) -> Result<Vec<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>(
            "SELECT id, name, category, description, price, sell_price, sell_location FROM items \
             WHERE (? IS NULL OR category = ?) AND (? IS NULL OR sell_location = ?) \
             ORDER BY id",
        )
        .bind(category)
        .bind(category)
        .bind(sell_location)
        .bind(sell_location)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_item(&self, id: i64) -> Result<Option<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>(
            "SELECT id, name, category, description, price, sell_price, sell_location \
             FROM items WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    // ── Breeding ──────────────────────────────────────────────────────

    /// Every breeding rule the monster participates in, as child, pedigree
    /// or second parent. One disjunctive scan, no duplicates.
    pub async fn breeding_involving(
        &self,
        monster_id: i64,
    ) -> Result<Vec<BreedingLink>, sqlx::Error> {
        sqlx::query_as::<_, BreedingLink>(
            "SELECT id, child_id, pedigree_id, parent2_id, pedigree_family_id, family2_id \
             FROM breeding_links \
             WHERE child_id = ? OR pedigree_id = ? OR parent2_id = ? \
             ORDER BY id",
        )
        .bind(monster_id)
        .bind(monster_id)
        .bind(monster_id)
        .fetch_all(&self.pool)
        .await
    }
}
