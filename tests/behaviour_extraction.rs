//! Behaviour tests for incremental WebJar extraction.

mod support;

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::WebJarFixture;
use webjars_extractor::{
    Cache, ExtractionError, ExtractionRequest, ExtractionSummary, Extractor, FileCache,
    MemoryCache,
};

#[derive(Default)]
struct ExtractionWorld {
    fixture: Option<WebJarFixture>,
    cache_file: Option<Utf8PathBuf>,
    memory: MemoryCache,
    outcome: Option<Result<ExtractionSummary, ExtractionError>>,
}

#[fixture]
fn world() -> ExtractionWorld {
    ExtractionWorld::default()
}

impl ExtractionWorld {
    fn webjars(&self) -> &WebJarFixture {
        self.fixture.as_ref().expect("fixture prepared")
    }

    fn summary(&self) -> &ExtractionSummary {
        match self.outcome.as_ref() {
            Some(Ok(summary)) => summary,
            Some(Err(error)) => panic!("expected extraction to succeed: {error}"),
            None => panic!("no extraction has run"),
        }
    }
}

fn extract(world: &mut ExtractionWorld, request: &ExtractionRequest) {
    let locator = world.webjars().locator();
    let outcome = match world.cache_file.as_ref() {
        Some(path) => {
            let cache = FileCache::open(path.clone()).expect("open cache file");
            let mut extractor = Extractor::with_cache(locator, cache);
            let result = extractor.extract(request);
            extractor.cache().save().expect("save cache file");
            result
        }
        None => Extractor::with_cache(locator, &mut world.memory).extract(request),
    };
    world.outcome = Some(outcome);
}

fn package_request(world: &ExtractionWorld, name: &str) -> ExtractionRequest {
    ExtractionRequest::package(name, world.webjars().dest())
}

// ---------------------------------------------------------------------------
// Given
// ---------------------------------------------------------------------------

#[given("the standard webjars archive is on the search path")]
fn given_standard_archive(world: &mut ExtractionWorld) {
    world.fixture = Some(WebJarFixture::standard());
}

#[given("a cache file is used")]
fn given_cache_file(world: &mut ExtractionWorld) {
    world.cache_file = Some(world.webjars().cache_path());
}

#[given("the package {name} has already been extracted")]
fn given_package_extracted(world: &mut ExtractionWorld, name: String) {
    let request = package_request(world, &name);
    extract(world, &request);
    world.summary();
}

#[given("every package has already been extracted")]
fn given_all_extracted(world: &mut ExtractionWorld) {
    let request = ExtractionRequest::all(world.webjars().dest());
    extract(world, &request);
    world.summary();
}

#[given("the file {key} is replaced with {content}")]
fn given_file_replaced(world: &mut ExtractionWorld, key: String, content: String) {
    world.webjars().write_dest(&key, &content);
}

// ---------------------------------------------------------------------------
// When
// ---------------------------------------------------------------------------

#[when("the package {name} is extracted")]
fn when_package_extracted(world: &mut ExtractionWorld, name: String) {
    let request = package_request(world, &name);
    extract(world, &request);
}

#[when("every package is extracted")]
fn when_all_extracted(world: &mut ExtractionWorld) {
    let request = ExtractionRequest::all(world.webjars().dest());
    extract(world, &request);
}

#[when("the node modules are extracted")]
fn when_node_modules_extracted(world: &mut ExtractionWorld) {
    let request = ExtractionRequest::node_modules(world.webjars().dest());
    extract(world, &request);
}

// ---------------------------------------------------------------------------
// Then
// ---------------------------------------------------------------------------

#[then("{count:usize} files were written")]
fn then_written(world: &mut ExtractionWorld, count: usize) {
    assert_eq!(world.summary().written().len(), count);
}

#[then("{count:usize} files were skipped")]
fn then_skipped(world: &mut ExtractionWorld, count: usize) {
    assert_eq!(world.summary().skipped().len(), count);
}

#[then("the file {key} is {size:u64} bytes long")]
fn then_file_size(world: &mut ExtractionWorld, key: String, size: u64) {
    let path = world.webjars().dest().join(&key);
    let metadata = std::fs::metadata(&path).expect("extracted file metadata");
    assert_eq!(metadata.len(), size, "unexpected size for {path}");
}

#[then("the file {key} exists")]
fn then_file_exists(world: &mut ExtractionWorld, key: String) {
    let path = world.webjars().dest().join(&key);
    assert!(path.is_file(), "expected {path} to exist");
}

#[then("the file {key} still reads {content}")]
fn then_file_reads(world: &mut ExtractionWorld, key: String, content: String) {
    assert_eq!(world.webjars().read(&key), content);
}

#[then("the destination holds no bootstrap files")]
fn then_no_bootstrap(world: &mut ExtractionWorld) {
    let files = world.webjars().extracted_files();
    assert!(
        files.iter().all(|file| !file.starts_with("bootstrap/")),
        "unexpected files: {files:?}"
    );
}

#[then("extraction fails because the package was not found")]
fn then_not_found(world: &mut ExtractionWorld) {
    match world.outcome.as_ref() {
        Some(Err(ExtractionError::NotFound { .. })) => {}
        Some(Err(other)) => panic!("expected NotFound, got {other}"),
        Some(Ok(_)) => panic!("expected extraction to fail"),
        None => panic!("no extraction has run"),
    }
}

#[then("the destination directory was not created")]
fn then_no_destination(world: &mut ExtractionWorld) {
    assert!(!world.webjars().dest().exists());
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/extraction.feature",
    name = "Extract a single package"
)]
fn scenario_extract_single_package(world: ExtractionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/extraction.feature",
    name = "Extracting again writes nothing"
)]
fn scenario_extracting_again(world: ExtractionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/extraction.feature",
    name = "A current file on disk is left alone"
)]
fn scenario_current_file_left_alone(world: ExtractionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/extraction.feature",
    name = "An unknown package is reported"
)]
fn scenario_unknown_package(world: ExtractionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/extraction.feature",
    name = "Extract every package"
)]
fn scenario_extract_every_package(world: ExtractionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/extraction.feature",
    name = "Extract node modules"
)]
fn scenario_extract_node_modules(world: ExtractionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/extraction.feature",
    name = "A cache file survives between runs"
)]
fn scenario_cache_file_survives(world: ExtractionWorld) {
    let _ = world;
}
