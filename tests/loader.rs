// Integration tests for the CSV bulk loader: idempotent reloads, bad rows
// skipped without aborting the batch, and missing sources tolerated.

use std::fs;
use std::path::Path;

use dqm_api::db::Database;
use dqm_api::loader::{
    self, BREEDING_CSV, FAMILIES_CSV, ITEMS_CSV, MONSTERS_CSV, SKILLS_CSV, SKILL_COMBINES_CSV,
    SKILL_LINKS_CSV,
};

async fn test_db() -> Database {
    Database::new("sqlite::memory:").await.unwrap()
}

const SKILL_HEADER: &str = "id,category,family_type,display_name,legacy_name,description,\
mp_cost,required_level,required_hp,required_mp,required_attack,required_defense,\
required_speed,required_intelligence,upgrade_to_id,upgrade_from_id";

fn write_fixture_set(dir: &Path) {
    fs::write(
        dir.join(FAMILIES_CSV),
        "id,name\n1,SLIME\n2,DRAGON\n",
    )
    .unwrap();
    fs::write(
        dir.join(MONSTERS_CSV),
        "id,display_name,legacy_name,description,family_id\n\
         1,Drake Slime,DrakSlime,tail and wings,1\n\
         2,Wild slime,FangSlime,red Mohawk,1\n",
    )
    .unwrap();
    fs::write(
        dir.join(SKILLS_CSV),
        format!(
            "{SKILL_HEADER}\n\
             1,Attack,Frizz,,Blaze,small fire,2,2,,7,,,,20,2,\n\
             2,Attack,Frizz,Frizzle,Blazemore,medium fire,4,12,,28,,,,62,,1\n"
        ),
    )
    .unwrap();
    fs::write(
        dir.join(SKILL_LINKS_CSV),
        "id,monster_id,skill_id\n1,1,2\n2,1,1\n",
    )
    .unwrap();
    fs::write(
        dir.join(SKILL_COMBINES_CSV),
        "id,combo_skill_id,needed_skill_id\n1,2,1\n",
    )
    .unwrap();
    fs::write(
        dir.join(BREEDING_CSV),
        "id,child_id,pedigree_id,parent2_id,pedigree_family_id,family2_id\n\
         1,1,,,1,2\n\
         2,2,,1,1,\n",
    )
    .unwrap();
    fs::write(
        dir.join(ITEMS_CSV),
        "id,name,category,description,price,sell_price,sell_location\n\
         1,Herb,recovery,Restores around 30 HP,10,6,Bazaar shop 1\n\
         2,Tiny medal,dungeon use,Give to medal master,,,found in field\n",
    )
    .unwrap();
}

#[tokio::test]
async fn test_full_load_and_idempotent_reload() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();
    write_fixture_set(dir.path());

    let report = loader::load_dir(&db, dir.path()).await;
    assert_eq!(report.total_inserted(), 13);
    for name in [
        FAMILIES_CSV,
        MONSTERS_CSV,
        SKILLS_CSV,
        SKILL_LINKS_CSV,
        SKILL_COMBINES_CSV,
        BREEDING_CSV,
        ITEMS_CSV,
    ] {
        let source = report.source(name).unwrap();
        assert_eq!(source.failed, 0, "{name} had failures");
        assert_eq!(source.skipped, 0, "{name} had skips");
    }

    // Reloading the same directory inserts nothing and overwrites nothing.
    let second = loader::load_dir(&db, dir.path()).await;
    assert_eq!(second.total_inserted(), 0);
    assert_eq!(second.source(FAMILIES_CSV).unwrap().skipped, 2);
    assert_eq!(second.source(MONSTERS_CSV).unwrap().skipped, 2);
    assert_eq!(second.source(ITEMS_CSV).unwrap().skipped, 2);

    assert_eq!(db.list_monsters(None).await.unwrap().len(), 2);
    assert_eq!(db.list_items(None, None).await.unwrap().len(), 2);
    assert_eq!(db.breeding_involving(1).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_fields_load_as_null() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();
    write_fixture_set(dir.path());

    loader::load_dir(&db, dir.path()).await;

    let blaze = db.get_skill(1).await.unwrap().unwrap();
    assert_eq!(blaze.display_name, None);
    assert_eq!(blaze.required_hp, None);
    assert_eq!(blaze.required_mp, Some(7));
    assert_eq!(blaze.upgrade_to_id, Some(2));
    assert_eq!(blaze.upgrade_from_id, None);

    let medal = db.get_item(2).await.unwrap().unwrap();
    assert_eq!(medal.price, None);
    assert_eq!(medal.sell_price, None);
}

#[tokio::test]
async fn test_duplicate_skill_row_keeps_first_links() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();

    // The third row reuses id 1; first row wins, including its links.
    fs::write(
        dir.path().join(SKILLS_CSV),
        format!(
            "{SKILL_HEADER}\n\
             1,Attack,Frizz,,Blaze,small fire,2,2,,7,,,,20,2,\n\
             2,Attack,Frizz,Frizzle,Blazemore,medium fire,4,12,,28,,,,62,,1\n\
             1,Support,Zap,,Impostor,should not land,1,1,,,,,,,,2\n"
        ),
    )
    .unwrap();

    let report = loader::load_dir(&db, dir.path()).await;
    let skills = report.source(SKILLS_CSV).unwrap();
    assert_eq!(skills.inserted, 2);
    assert_eq!(skills.skipped, 1);
    assert_eq!(skills.failed, 0);

    let blaze = db.get_skill(1).await.unwrap().unwrap();
    assert_eq!(blaze.legacy_name, "Blaze");
    assert_eq!(blaze.upgrade_to_id, Some(2));
    assert_eq!(blaze.upgrade_from_id, None);
}

#[tokio::test]
async fn test_rejected_upgrade_link_counts_row_once() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();

    // Skill 1 points its upgrade at a skill that never exists.
    fs::write(
        dir.path().join(SKILLS_CSV),
        format!(
            "{SKILL_HEADER}\n\
             1,Attack,Frizz,,Blaze,small fire,2,2,,7,,,,20,99,\n\
             2,Attack,Frizz,Frizzle,Blazemore,medium fire,4,12,,28,,,,62,,\n"
        ),
    )
    .unwrap();

    let report = loader::load_dir(&db, dir.path()).await;
    let skills = report.source(SKILLS_CSV).unwrap();
    assert_eq!(skills.inserted + skills.skipped + skills.failed, 2);
    assert_eq!(skills.inserted, 1);
    assert_eq!(skills.failed, 1);

    // The base row stays stored, with its links left null.
    let blaze = db.get_skill(1).await.unwrap().unwrap();
    assert_eq!(blaze.legacy_name, "Blaze");
    assert_eq!(blaze.upgrade_to_id, None);
}

#[tokio::test]
async fn test_dangling_reference_skips_row_and_continues() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();

    fs::write(dir.path().join(FAMILIES_CSV), "id,name\n1,SLIME\n").unwrap();
    // Monster 2 points at a family that does not exist; 1 and 3 are fine.
    fs::write(
        dir.path().join(MONSTERS_CSV),
        "id,display_name,legacy_name,description,family_id\n\
         1,Drake Slime,DrakSlime,tail and wings,1\n\
         2,Ghost,Spooky,lost soul,42\n\
         3,Wild slime,FangSlime,red Mohawk,1\n",
    )
    .unwrap();

    let report = loader::load_dir(&db, dir.path()).await;
    let monsters = report.source(MONSTERS_CSV).unwrap();
    assert_eq!(monsters.inserted, 2);
    assert_eq!(monsters.failed, 1);

    let stored = db.list_monsters(None).await.unwrap();
    let ids: Vec<i64> = stored.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_malformed_breeding_designations_are_rejected() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();

    fs::write(dir.path().join(FAMILIES_CSV), "id,name\n1,SLIME\n").unwrap();
    fs::write(
        dir.path().join(MONSTERS_CSV),
        "id,display_name,legacy_name,description,family_id\n\
         1,Drake Slime,DrakSlime,tail and wings,1\n",
    )
    .unwrap();
    // Row 1 names both a monster and a family for the pedigree slot, row 2
    // names neither for the partner slot, row 3 is well formed.
    fs::write(
        dir.path().join(BREEDING_CSV),
        "id,child_id,pedigree_id,parent2_id,pedigree_family_id,family2_id\n\
         1,1,1,,1,1\n\
         2,1,1,,,\n\
         3,1,,,1,1\n",
    )
    .unwrap();

    let report = loader::load_dir(&db, dir.path()).await;
    let breeding = report.source(BREEDING_CSV).unwrap();
    assert_eq!(breeding.inserted, 1);
    assert_eq!(breeding.failed, 2);

    let stored = db.breeding_involving(1).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, 3);
}

#[tokio::test]
async fn test_malformed_row_skipped_rest_of_source_loads() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();

    // Second row has a non-numeric id.
    fs::write(
        dir.path().join(FAMILIES_CSV),
        "id,name\n1,SLIME\nnot-a-number,DRAGON\n3,BEAST\n",
    )
    .unwrap();

    let report = loader::load_dir(&db, dir.path()).await;
    let families = report.source(FAMILIES_CSV).unwrap();
    assert_eq!(families.inserted, 2);
    assert_eq!(families.failed, 1);

    assert!(db.get_family(1).await.unwrap().is_some());
    assert!(db.get_family(3).await.unwrap().is_some());
}

#[tokio::test]
async fn test_missing_sources_are_tolerated() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();

    // Only the families source is present.
    fs::write(dir.path().join(FAMILIES_CSV), "id,name\n1,SLIME\n").unwrap();

    let report = loader::load_dir(&db, dir.path()).await;
    assert_eq!(report.source(FAMILIES_CSV).unwrap().inserted, 1);
    let monsters = report.source(MONSTERS_CSV).unwrap();
    assert_eq!(monsters.inserted, 0);
    assert_eq!(monsters.failed, 0);

    assert!(db.get_family(1).await.unwrap().is_some());
}
