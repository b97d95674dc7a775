//! Integration tests for skillplan
//!
//! Exercise the public API end to end: catalog loading, plan editing,
//! slots on disk and share links.

mod catalog_flow;
mod plan_flow;
mod share_flow;
mod slots_flow;

use skillplan::skills::CatalogIndex;
use std::fs;
use std::path::{Path, PathBuf};

pub const CATALOG_CSV: &str = "\
id,skill,sp,category,reading,child_id,tags,explain
100,右回り◎,110,通常スキル,みぎまわりにじゅうまる,101,コース,右回りのレースが得意になる
101,右回り○,90,通常スキル,みぎまわりまる,,コース,右回りのレースが少し得意になる
200,Corner Recovery,180,緑スキル,こーなーかいふく,201|202,回復,Recover stamina in corners
201,Corner Recovery Lite,100,緑スキル,,202,回復,
202,Breath of Fresh Air,80,緑スキル,,,回復,
300,Straightaway Adept,120,通常スキル,,,速度,
";

/// Write the shared catalog into `dir` and return its path.
pub fn write_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("skills.csv");
    fs::write(&path, CATALOG_CSV).unwrap();
    path
}

pub fn catalog() -> CatalogIndex {
    CatalogIndex::from_csv(CATALOG_CSV).unwrap()
}
