// Response payload shaping. Expansion is one-hop only: an embedded entity
// is serialized in its flat base form and never re-expands its own
// associations. Optional fields serialize as JSON null, not omitted.

use serde::Serialize;

use crate::db::{BreedingLink, Item, Monster, MonsterFamily, Skill, SkillCombine};

/// A monster with its owning family attached.
#[derive(Debug, Serialize)]
pub struct MonsterView {
    #[serde(flatten)]
    pub monster: Monster,
    pub family: MonsterFamily,
}

/// A monster with family and its known skills, in link-insertion order.
#[derive(Debug, Serialize)]
pub struct MonsterWithSkillsView {
    #[serde(flatten)]
    pub monster: Monster,
    pub family: MonsterFamily,
    pub skills: Vec<Skill>,
}

/// A family with every monster that belongs to it.
#[derive(Debug, Serialize)]
pub struct FamilyView {
    #[serde(flatten)]
    pub family: MonsterFamily,
    pub monsters: Vec<Monster>,
}

/// A skill with its upgrade neighbours resolved; each is null when the
/// corresponding link is absent.
#[derive(Debug, Serialize)]
pub struct SkillView {
    #[serde(flatten)]
    pub skill: Skill,
    pub upgrade_to: Option<Skill>,
    pub upgrade_from: Option<Skill>,
}

/// One prerequisite edge with the required skill resolved.
#[derive(Debug, Serialize)]
pub struct SkillCombineView {
    #[serde(flatten)]
    pub combine: SkillCombine,
    pub needed_skill: Skill,
}

pub type ItemView = Item;

/// A breeding rule with all relationship fields resolved. The four parent
/// fields mirror the stored columns: exactly one of pedigree/
/// pedigree_family and one of parent2/family2 is non-null.
#[derive(Debug, Serialize)]
pub struct BreedingView {
    #[serde(flatten)]
    pub link: BreedingLink,
    pub child: Monster,
    pub pedigree: Option<Monster>,
    pub parent2: Option<Monster>,
    pub pedigree_family: Option<MonsterFamily>,
    pub family2: Option<MonsterFamily>,
}
