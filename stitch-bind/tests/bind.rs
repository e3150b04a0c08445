use std::fs;

use stitch_bind::bind::{self, BindRun};
use stitch_bind::output::{CatalogueSink, JsonFileSink, MemorySink};
use stitch_bind::{BindConfig, CatalogueEntry};

const KB: usize = 1024;
const MB: usize = 1024 * 1024;

struct Fixture {
    _dir: tempfile::TempDir,
    config: BindConfig,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("public").join("assets").join("models")).unwrap();
    fs::create_dir_all(root.join("public").join("assets").join("images")).unwrap();
    let config = BindConfig::for_root(root);
    Fixture { _dir: dir, config }
}

impl Fixture {
    fn write_csv(&self, contents: &str) {
        fs::write(&self.config.csv_path, contents).unwrap();
    }

    fn write_model(&self, name: &str, size: usize) {
        fs::write(self.config.models_dir.join(name), vec![0u8; size]).unwrap();
    }

    fn write_image(&self, name: &str) {
        fs::write(self.config.images_dir.join(name), b"img").unwrap();
    }
}

fn assert_invariants(entries: &[CatalogueEntry]) {
    let mut skus: Vec<&str> = entries.iter().map(|e| e.sku.as_str()).collect();
    skus.sort();
    let before = skus.len();
    skus.dedup();
    assert_eq!(skus.len(), before, "SKUs must be catalogue-unique");

    for entry in entries {
        assert_eq!(entry.has_model, entry.model_path.is_some());
        assert_eq!(entry.has_image, entry.image_path.is_some());
        assert!(!entry.sku.is_empty());
    }
}

#[test]
fn clean_pairing() {
    let fx = fixture();
    fx.write_csv("Category,SKU,Product Name,WAS,NOW,SAVE\nSofas,S100,Green Sofa,5999,4999,1000\n");
    fx.write_model("s100_green_sofa.glb", MB);
    fx.write_image("s100.jpg");

    let outcome = bind::build_catalogue(&fx.config).unwrap();
    assert_invariants(&outcome.entries);
    assert_eq!(outcome.entries.len(), 1);

    let entry = &outcome.entries[0];
    assert_eq!(entry.sku, "S100");
    assert_eq!(entry.name, "Green Sofa");
    assert_eq!(entry.now.as_deref(), Some("4999"));
    assert!(entry.has_model);
    assert_eq!(
        entry.model_path.as_deref(),
        Some("/assets/models/s100_green_sofa.glb")
    );
    assert_eq!(entry.image_path.as_deref(), Some("/assets/images/s100.jpg"));

    assert_eq!(outcome.summary.models_paired, 1);
    assert_eq!(outcome.summary.rows_unpaired, 0);
}

#[test]
fn raw_filenames_are_sanitized_before_pairing() {
    let fx = fixture();
    fx.write_csv("Category,SKU,Product Name\nSofas,S100,Green Sofa\n");
    fx.write_model("S100 Green Sofa (FINAL).GLB", 4 * KB);

    let outcome = bind::build_catalogue(&fx.config).unwrap();
    assert_eq!(
        outcome.entries[0].model_path.as_deref(),
        Some("/assets/models/s100_green_sofa_final.glb")
    );
    assert!(fx.config.models_dir.join("s100_green_sofa_final.glb").exists());
}

#[test]
fn orphan_model_gets_inferred_entry() {
    let fx = fixture();
    // No CSV at all: discovery-only mode.
    fx.write_model("x9_floor_lamp.glb", 2 * KB);

    let outcome = bind::build_catalogue(&fx.config).unwrap();
    assert_invariants(&outcome.entries);
    assert_eq!(outcome.entries.len(), 1);

    let entry = &outcome.entries[0];
    assert_eq!(entry.sku, "X9");
    assert_eq!(entry.name, "X9 Floor Lamp");
    assert_eq!(entry.category, "Miscellaneous");
    assert_eq!(entry.now.as_deref(), Some("Ask for Price"));
    assert!(entry.was.is_none());
    assert!(entry.has_model);
}

#[test]
fn orphan_category_comes_from_keyword_table() {
    let fx = fixture();
    fx.write_model("x9_bedside_table.glb", 2 * KB);
    fx.write_model("z3_writing_desk.glb", 2 * KB);

    let outcome = bind::build_catalogue(&fx.config).unwrap();
    let by_sku = |sku: &str| {
        outcome
            .entries
            .iter()
            .find(|e| e.sku == sku)
            .unwrap_or_else(|| panic!("no entry {sku}"))
    };

    // "bedside" hits the "bed" keyword before "table" is ever scanned.
    assert_eq!(by_sku("X9").category, "Beds");
    assert_eq!(by_sku("X9").name, "X9 Bedside Table");
    assert_eq!(by_sku("Z3").category, "Tables");
}

#[test]
fn duplicate_skus_get_disambiguation_suffixes() {
    let fx = fixture();
    fx.write_csv(
        "Category,SKU,Product Name\n\
         Sofas,S1,Red Sofa Classic\n\
         Sofas,S1,Red Sofa Deluxe\n",
    );
    // Pairs with the first S1 row via name containment (SKU key "s1" is
    // below the matching floor).
    fx.write_model("redsofaclassic.glb", 2 * KB);

    let outcome = bind::build_catalogue(&fx.config).unwrap();
    assert_invariants(&outcome.entries);
    assert_eq!(outcome.entries.len(), 2);

    let skus: Vec<&str> = outcome.entries.iter().map(|e| e.sku.as_str()).collect();
    assert!(skus.contains(&"S1"));
    assert!(skus.contains(&"S1_2"));

    let unpaired = outcome.entries.iter().find(|e| e.sku == "S1_2").unwrap();
    assert_eq!(unpaired.name, "Red Sofa Deluxe");
    assert!(!unpaired.has_model);
}

#[test]
fn unpaired_rows_keep_metadata_and_images() {
    let fx = fixture();
    fx.write_csv("Category,SKU,Product Name,WAS,NOW,SAVE\nBeds,B42,King Bed,900,800,100\n");
    fx.write_image("b42_king_bed.png");

    let outcome = bind::build_catalogue(&fx.config).unwrap();
    assert_eq!(outcome.entries.len(), 1);

    let entry = &outcome.entries[0];
    assert_eq!(entry.sku, "B42");
    assert!(!entry.has_model);
    assert_eq!(
        entry.image_path.as_deref(),
        Some("/assets/images/b42_king_bed.png")
    );
    assert_eq!(entry.was.as_deref(), Some("900"));
    assert_eq!(outcome.summary.rows_unpaired, 1);
}

#[test]
fn no_data_loss_across_all_paths() {
    let fx = fixture();
    fx.write_csv(
        "Category,SKU,Product Name\n\
         Sofas,S100,Green Sofa\n\
         Beds,B42,King Bed\n",
    );
    fx.write_model("s100_green_sofa.glb", 2 * KB);
    fx.write_model("orphan_stool.glb", 2 * KB);

    let outcome = bind::build_catalogue(&fx.config).unwrap();
    assert_invariants(&outcome.entries);

    // One entry per model + one per unpaired row: 2 models, 1 leftover row.
    assert_eq!(outcome.entries.len(), 3);
    assert_eq!(outcome.summary.models_paired, 1);
    assert_eq!(outcome.summary.models_orphaned, 1);
    assert_eq!(outcome.summary.rows_unpaired, 1);
    assert_eq!(outcome.summary.models_discovered, 2);
    assert_eq!(outcome.summary.entries_with_model, 2);
}

#[test]
fn oversized_model_is_excluded_but_row_metadata_survives() {
    let mut fx = fixture();
    fx.config.max_model_mb = 1;
    fx.write_csv("Category,SKU,Product Name,WAS,NOW,SAVE\nSofas,S200,Big Couch,100,90,10\n");
    fx.write_model("s200_big_couch.glb", MB + KB);

    let outcome = bind::build_catalogue(&fx.config).unwrap();
    assert_invariants(&outcome.entries);

    // Known quirk, preserved deliberately: the matched row is consumed
    // (its prices survive without the asset), but the oversized model is
    // never claimed, so step 2 also emits an inferred twin for it.
    assert_eq!(outcome.entries.len(), 2);

    let row_entry = &outcome.entries[0];
    assert_eq!(row_entry.sku, "S200");
    assert_eq!(row_entry.now.as_deref(), Some("90"));
    assert!(row_entry.model_path.is_none());
    assert!(row_entry.image_path.is_none());

    let twin = &outcome.entries[1];
    assert_eq!(twin.sku, "S200_2");
    assert_eq!(twin.now.as_deref(), Some("Ask for Price"));
    assert!(twin.model_path.is_none());

    assert_eq!(outcome.summary.oversized_excluded, 2);
    assert_eq!(outcome.summary.rows_unpaired, 0);
}

#[test]
fn oversized_orphan_keeps_entry_without_model() {
    let mut fx = fixture();
    fx.config.max_model_mb = 1;
    fx.write_model("giant_wardrobe.glb", 2 * MB);

    let outcome = bind::build_catalogue(&fx.config).unwrap();
    assert_eq!(outcome.entries.len(), 1);
    let entry = &outcome.entries[0];
    assert_eq!(entry.category, "Storage");
    assert!(entry.model_path.is_none());
    assert!(!entry.has_model);
    assert_eq!(outcome.summary.oversized_excluded, 1);
}

#[test]
fn base_url_switches_model_references_to_absolute() {
    let mut fx = fixture();
    fx.config.base_url = Some("https://blob.example.com".to_string());
    fx.write_model("k1_fancy_fridge.glb", 2 * KB);

    let outcome = bind::build_catalogue(&fx.config).unwrap();
    assert_eq!(
        outcome.entries[0].model_path.as_deref(),
        Some("https://blob.example.com/k1_fancy_fridge.glb")
    );
    // Images stay local regardless.
    assert_eq!(outcome.entries[0].category, "Electronics");
}

#[test]
fn missing_models_dir_with_committed_catalogue_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("public")).unwrap();
    let config = BindConfig::for_root(root);
    fs::write(&config.output_path, "[]").unwrap();

    let mut sink = MemorySink::default();
    let run = bind::run(&config, &mut sink).unwrap();
    assert!(matches!(run, BindRun::SkippedExistingCatalogue));
    assert!(sink.entries.is_empty());
    // Committed catalogue untouched.
    assert_eq!(fs::read_to_string(&config.output_path).unwrap(), "[]");
}

#[test]
fn missing_everything_still_produces_an_empty_catalogue() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("public")).unwrap();
    let config = BindConfig::for_root(root);

    let mut sink = MemorySink::default();
    let run = bind::run(&config, &mut sink).unwrap();
    assert!(matches!(run, BindRun::Completed(_)));
    assert!(sink.entries.is_empty());
}

#[test]
fn runs_are_deterministic() {
    let fx = fixture();
    fx.write_csv(
        "Category,SKU,Product Name,WAS,NOW,SAVE,Colour\n\
         Sofas,S100,Green Sofa,5999,4999,1000,Green\n\
         Beds,B42,King Bed,900,800,100,Oak\n",
    );
    fx.write_model("s100_green_sofa.glb", 2 * KB);
    fx.write_model("orphan_stool.glb", 2 * KB);
    fx.write_image("s100.jpg");
    fx.write_image("b42_king_bed.png");

    let first = write_json(&fx.config, "first.json");
    let second = write_json(&fx.config, "second.json");
    assert_eq!(first, second, "two runs must produce byte-identical JSON");
}

fn write_json(config: &BindConfig, name: &str) -> String {
    let outcome = bind::build_catalogue(config).unwrap();
    let path = config.output_path.parent().unwrap().join(name);
    let mut sink = JsonFileSink::new(&path);
    sink.write(&outcome.entries).unwrap();
    fs::read_to_string(&path).unwrap()
}

#[test]
fn extra_csv_columns_pass_through_to_the_catalogue() {
    let fx = fixture();
    fx.write_csv("Category,SKU,Product Name,Colour\nSofas,S100,Green Sofa,Emerald\n");

    let outcome = bind::build_catalogue(&fx.config).unwrap();
    let json = serde_json::to_string(&outcome.entries).unwrap();
    assert!(json.contains("\"Colour\":\"Emerald\""));
}

#[test]
fn output_contract_field_names() {
    let fx = fixture();
    fx.write_model("s1_sofa.glb", KB);

    let outcome = bind::build_catalogue(&fx.config).unwrap();
    let json = serde_json::to_string_pretty(&outcome.entries).unwrap();
    for field in [
        "\"Category\"",
        "\"SKU\"",
        "\"Product Name\"",
        "\"WAS\"",
        "\"NOW\"",
        "\"SAVE\"",
        "\"modelPath\"",
        "\"imagePath\"",
        "\"hasModel\"",
        "\"hasImage\"",
    ] {
        assert!(json.contains(field), "missing {field} in {json}");
    }
}
