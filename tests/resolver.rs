mod common;

use std::{fs, time::Duration};

use bionlp_ingest::{CachedPathResolver, DatasetError, LocalResolver, PathResolver};

#[test]
fn local_paths_pass_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.txt");
    fs::write(&path, "x").unwrap();

    assert_eq!(LocalResolver.resolve(path.to_str().unwrap()).unwrap(), path);
    let file_url = format!("file://{}", path.display());
    assert_eq!(LocalResolver.resolve(&file_url).unwrap(), path);

    let missing = dir.path().join("missing.txt");
    assert!(matches!(
        LocalResolver.resolve(missing.to_str().unwrap()).unwrap_err(),
        DatasetError::MissingFile(_)
    ));
}

#[test]
fn local_resolver_refuses_urls() {
    let err = LocalResolver
        .resolve("https://example.org/corpus.txt")
        .unwrap_err();
    assert!(matches!(err, DatasetError::Fetch { .. }));
}

#[test]
fn cached_download_is_served_without_network() {
    let cache = tempfile::tempdir().unwrap();
    let resolver = CachedPathResolver::new(cache.path(), "bionlp-ingest-tests").unwrap();
    let url = "https://example.invalid/datasets/med_mentions.tar.gz";

    let cached = resolver.cache_path(url);
    assert!(cached.starts_with(cache.path()));
    assert!(cached.to_string_lossy().ends_with("med_mentions.tar.gz"));
    fs::write(&cached, "payload").unwrap();

    assert_eq!(resolver.resolve(url).unwrap(), cached);
    assert!(resolver.cached_meta(url).unwrap().is_none());
}

#[test]
fn distinct_urls_get_distinct_cache_entries() {
    let cache = tempfile::tempdir().unwrap();
    let resolver = CachedPathResolver::new(cache.path(), "bionlp-ingest-tests").unwrap();
    assert_ne!(
        resolver.cache_path("https://a.example/data.tsv"),
        resolver.cache_path("https://b.example/data.tsv")
    );
}

#[test]
fn unsupported_schemes_fail() {
    let cache = tempfile::tempdir().unwrap();
    let resolver = CachedPathResolver::new(cache.path(), "bionlp-ingest-tests").unwrap();
    match resolver.resolve("s3://bucket/corpus.txt").unwrap_err() {
        DatasetError::Fetch { url, .. } => assert_eq!(url, "s3://bucket/corpus.txt"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn cache_directory_is_created() {
    let root = tempfile::tempdir().unwrap();
    let cache_dir = root.path().join("nested").join("cache");
    let resolver = CachedPathResolver::new(&cache_dir, "bionlp-ingest-tests").unwrap();
    assert!(cache_dir.is_dir());
    assert_eq!(resolver.cache_dir(), cache_dir.as_path());
}

#[test]
fn download_is_cached_with_metadata() {
    let cache = tempfile::tempdir().unwrap();
    let resolver = CachedPathResolver::new(cache.path(), "bionlp-ingest-tests").unwrap();
    let body = b"111|t|Cancer\n111|a|Cancer is bad.\n".to_vec();
    let (base, server) = common::serve_once("200 OK", body.clone(), None);
    let url = format!("{base}/corpus_pubtator.txt");

    let path = resolver.resolve(&url).unwrap();
    server.join().unwrap();
    assert_eq!(path, resolver.cache_path(&url));
    assert_eq!(fs::read(&path).unwrap(), body);

    let meta = resolver.cached_meta(&url).unwrap().unwrap();
    assert_eq!(meta.url, url);
    assert_eq!(meta.bytes, body.len() as u64);

    // the server is gone, so this can only come from the cache
    assert_eq!(resolver.resolve(&url).unwrap(), path);
}

#[test]
fn http_error_status_is_a_fetch_error() {
    let cache = tempfile::tempdir().unwrap();
    let resolver = CachedPathResolver::new(cache.path(), "bionlp-ingest-tests").unwrap();
    let (base, server) = common::serve_once("404 Not Found", b"gone".to_vec(), None);
    let url = format!("{base}/missing.tsv");

    match resolver.resolve(&url).unwrap_err() {
        DatasetError::Fetch { url: failed, message } => {
            assert_eq!(failed, url);
            assert!(message.contains("404"), "{message}");
        }
        other => panic!("unexpected {other:?}"),
    }
    server.join().unwrap();
    assert!(!resolver.cache_path(&url).exists());
    assert!(resolver.cached_meta(&url).unwrap().is_none());
}

#[test]
fn slow_downloads_are_not_cut_off() {
    let cache = tempfile::tempdir().unwrap();
    let resolver = CachedPathResolver::new(cache.path(), "bionlp-ingest-tests").unwrap();
    // 34 bytes at one per second outlasts reqwest's 30 second default timeout
    let body = vec![b'x'; 34];
    let (base, server) =
        common::serve_once("200 OK", body.clone(), Some(Duration::from_secs(1)));
    let url = format!("{base}/med_mentions.tar.gz");

    let path = resolver.resolve(&url).unwrap();
    server.join().unwrap();
    assert_eq!(fs::read(path).unwrap(), body);
}

#[test]
fn long_urls_get_bounded_cache_names() {
    let cache = tempfile::tempdir().unwrap();
    let resolver = CachedPathResolver::new(cache.path(), "bionlp-ingest-tests").unwrap();
    let query = "token=".to_string() + &"a1b2c3d4".repeat(40);
    let first = format!("https://data.example/releases/med_mentions.tar.gz?{query}&part=1");
    let second = format!("https://data.example/releases/med_mentions.tar.gz?{query}&part=2");

    let name = |url: &str| {
        resolver
            .cache_path(url)
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    };
    let first_name = name(&first);
    assert!(first_name.len() + ".json".len() <= 255, "{first_name}");
    assert!(first_name.ends_with("%26part%3D1"), "{first_name}");
    assert_ne!(first_name, name(&second));
    assert_eq!(first_name, name(&first));

    // short URLs keep their readable encoded form
    assert_eq!(
        name("https://a.example/data.tsv"),
        "https%3A%2F%2Fa.example%2Fdata.tsv"
    );
}
