use super::*;
use homecache_fingerprint::hash::content_hash;
use homecache_manifest::ManifestEntry;
use homecache_storage::DEFAULT_ARCHIVE_DIR;
use homecache_storage::backend::{DryRunArchive, LocalArchive};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const HOST: &str = "scee-home.playstation.net";
const SDAT_3_3_TRAILER: &[u8; 16] = b"SDATA 3.3.0.W\x00\x00\x00";

/// A search root (`CACHE/`), an archive root and the run logs, all inside one
/// temporary directory.
struct Harness {
    tmp: TempDir,
    search_root: PathBuf,
    fingerprinter: Fingerprinter,
    capabilities: Capabilities,
    options: Options,
    dry_run: bool,
}
impl Harness {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let search_root = tmp.path().join("CACHE");
        fs::create_dir_all(&search_root).unwrap();
        Self {
            tmp,
            search_root,
            fingerprinter: Fingerprinter::default(),
            capabilities: Capabilities::default(),
            options: Options::default(),
            dry_run: false,
        }
    }

    fn root(&self) -> &Path {
        self.tmp.path()
    }

    fn payload(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.root().join("CACHE").join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    fn archived(&self, path: &str) -> Option<Vec<u8>> {
        fs::read(self.root().join(DEFAULT_ARCHIVE_DIR).join(path)).ok()
    }

    fn seed(&self, path: &str, bytes: &[u8]) {
        let path = self.root().join(DEFAULT_ARCHIVE_DIR).join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    fn log(&self, name: &str) -> String {
        fs::read_to_string(self.root().join(name)).unwrap_or_default()
    }

    fn date_log(&self, name: &str) -> DateLog {
        DateLog::new(self.root().join(name)).read_only(self.dry_run)
    }

    fn context(&self) -> Context {
        let layout = ArchiveLayout::new(self.root(), DEFAULT_ARCHIVE_DIR);
        let local: BackendHandle = Arc::new(LocalArchive::new("archive", layout.base()).unwrap());
        let backend: BackendHandle = if self.dry_run { Arc::new(DryRunArchive::new(local)) } else { local };
        Context {
            backend,
            index: CandidateIndex::build(&self.search_root),
            fingerprinter: self.fingerprinter.clone(),
            reports: Reports {
                dupes: AppendLog::new(self.root().join("dupes.log")),
                no_file: AppendLog::new(self.root().join("nofile.log")),
                video: AppendLog::new(layout.video_log()),
            },
            layout,
            capabilities: self.capabilities.clone(),
            options: self.options.clone(),
        }
    }

    /// Runs a manifest and returns the final counters and every status line.
    fn run(&self, manifest: &str) -> (Counters, Vec<String>) {
        let ctx = self.context();
        let lines: Vec<String> = manifest.lines().map(str::to_string).collect();
        let mut copied = Vec::new();
        let counters = run(&ctx, &lines, |event| {
            if let RunEvent::Copied(status) = event {
                copied.push(status.to_string());
            }
        });
        (counters, copied)
    }

    fn process(&self, line: &str) -> Vec<Outcome> {
        let ctx = self.context();
        let entry = ManifestEntry::parse(line).unwrap();
        let mut counters = Counters::default();
        process_entry(&ctx, &entry, &mut counters, &mut |_| {})
    }
}

fn line(hash: &str, url: &str, date: &str) -> String {
    format!("{hash}|{url}|{date}|mycache")
}

#[test]
fn test_round_trip() {
    let harness = Harness::new();
    harness.payload("ABC123_DAT0", b"<rss><channel/></rss>");

    let (counters, copied) = harness.run(&line("ABC123", "scee/objects/foo/bar.xml", "05Jan2012"));

    assert_eq!(copied, vec![format!("COPIED 1 mycache/{HOST}/objects/foo/bar.xml")]);
    assert_eq!(counters, Counters { lines: 1, copied: 1, ..Counters::default() });
    assert_eq!(harness.archived(&format!("{HOST}/objects/foo/bar.xml")).unwrap(), b"<rss><channel/></rss>");
    assert_eq!(harness.log("dupes.log"), "");
    assert_eq!(harness.log("nofile.log"), "");
}

#[test]
fn test_second_run_only_records_duplicates() {
    let harness = Harness::new();
    harness.payload("ABC123_DAT0", b"<rss><channel/></rss>");
    let manifest = line("ABC123", "scee/objects/foo/bar.xml", "05Jan2012");

    harness.run(&manifest);
    let (counters, copied) = harness.run(&manifest);

    assert!(copied.is_empty());
    assert_eq!(counters.dupes, 1);
    assert_eq!(counters.copied, 0);
    assert_eq!(harness.log("dupes.log"), format!("mycache\tCACHE/ABC123_DAT0\t{HOST}/objects/foo/bar.xml\n"));
}

#[test]
fn test_corrupt_sample_only_grows() {
    let small = b"not a png".as_slice();
    let large = b"still not a png, but longer".as_slice();
    let target = format!("corrupted/{HOST}/objects/pic.png");

    for (first, second) in [(small, large), (large, small)] {
        let harness = Harness::new();
        harness.payload("AAAA_DAT", first);
        harness.payload("BBBB_DAT", second);
        let manifest = [line("AAAA", "scee/objects/pic.png", ""), line("BBBB", "scee/objects/pic.png", "")].join("\n");

        let (counters, copied) = harness.run(&manifest);

        assert_eq!(harness.archived(&target).unwrap(), large);
        assert_eq!(copied[0], format!("COPIED 1 mycache/{target} - CORRUPT"));
        if first == small {
            assert_eq!(copied[1], format!("COPIED 2 mycache/{target} - CORRUPT ( NEW FILE SIZE )"));
        } else {
            assert_eq!(copied.len(), 1);
        }
        assert_eq!(counters.corrupt, copied.len() as u64);
        assert!(harness.archived(&format!("{HOST}/objects/pic.png")).is_none());
    }
}

#[test]
fn test_corrupt_tie_keeps_first_sample() {
    let harness = Harness::new();
    harness.payload("AAAA_DAT", b"garbage-one");
    harness.payload("BBBB_DAT", b"garbage-two");

    harness.run(&line("AAAA", "scee/objects/pic.png", ""));
    let outcomes = harness.process(&line("BBBB", "scee/objects/pic.png", ""));

    assert_eq!(outcomes, vec![Outcome::Skipped(SkipReason::NotLarger)]);
    assert_eq!(harness.archived(&format!("corrupted/{HOST}/objects/pic.png")).unwrap(), b"garbage-one");
}

#[test]
fn test_forced_corruption() {
    let mut harness = Harness::new();
    let source = harness.payload("AAAA_DAT", b"plain text that is fine");
    harness.capabilities.corrupt_exceptions = ExceptionSet::parse(&content_hash(&source).unwrap().to_lowercase());

    let (counters, copied) = harness.run(&line("AAAA", "scee/objects/notes.txt", ""));

    assert_eq!(copied, vec![format!("COPIED 1 mycache/corrupted/{HOST}/objects/notes.txt - CORRUPT")]);
    assert_eq!(counters.corrupt, 1);
}

#[test]
fn test_modified_container() {
    let harness = Harness::new();
    let mut bytes = b"payload bytes".to_vec();
    bytes.extend_from_slice(SDAT_3_3_TRAILER);
    harness.payload("AAAA_DAT", &bytes);

    let (counters, copied) = harness.run(&line("AAAA", "scee/objects/thing.sdat", ""));

    assert_eq!(copied, vec![format!("COPIED 1 mycache/modified/{HOST}/objects/thing.sdat - MODIFIED")]);
    assert_eq!(counters.modified, 1);
    assert_eq!(harness.archived(&format!("modified/{HOST}/objects/thing.sdat")).unwrap(), bytes);
}

#[test]
fn test_modified_tree_keeps_latest_content() {
    let harness = Harness::new();
    let mut first = b"first payload".to_vec();
    first.extend_from_slice(SDAT_3_3_TRAILER);
    let mut second = b"second, different payload".to_vec();
    second.extend_from_slice(SDAT_3_3_TRAILER);
    harness.payload("AAAA_DAT", &first);
    harness.payload("BBBB_DAT", &second);
    let target = format!("modified/{HOST}/objects/thing.sdat");

    let (counters, copied) =
        harness.run(&[line("AAAA", "scee/objects/thing.sdat", ""), line("BBBB", "scee/objects/thing.sdat", "")].join("\n"));

    assert_eq!(
        copied,
        vec![format!("COPIED 1 mycache/{target} - MODIFIED"), format!("COPIED 2 mycache/{target} - MODIFIED")]
    );
    assert_eq!(counters.modified, 2);
    assert_eq!(harness.archived(&target).unwrap(), second);

    let outcomes = harness.process(&line("BBBB", "scee/objects/thing.sdat", ""));
    assert_eq!(outcomes, vec![Outcome::Duplicate { slot: PathBuf::from(&target) }]);
    assert_eq!(harness.archived(&target).unwrap(), second);
}

#[test]
fn test_xml_corrupt_payload_goes_to_corrupted_tree() {
    let harness = Harness::new();
    harness.payload("AAAA_DAT", b"<rss><channel>");

    let (counters, copied) = harness.run(&line("AAAA", "scee/objects/feed.xml", ""));

    assert_eq!(copied, vec![format!("COPIED 1 mycache/corrupted/{HOST}/objects/feed.xml - CORRUPT")]);
    assert_eq!(counters.corrupt, 1);
    assert_eq!(harness.archived(&format!("corrupted/{HOST}/objects/feed.xml")).unwrap(), b"<rss><channel>");
    assert!(harness.archived(&format!("{HOST}/objects/feed.xml")).is_none());
}

#[cfg(unix)]
#[test]
fn test_video_reported_broken_goes_to_corrupted_tree() {
    use homecache_fingerprint::Probe;
    use std::os::unix::fs::PermissionsExt;

    let mut harness = Harness::new();
    let script = harness.root().join("ffprobe.sh");
    fs::write(&script, "#!/bin/sh\necho '{}'\necho '[mov,mp4] moov atom not found' >&2\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    harness.fingerprinter = Fingerprinter::new(Probe::discover(&script).unwrap());
    harness.payload("AAAA_DAT", b"not really a video");

    let (counters, copied) = harness.run(&line("AAAA", "scee/objects/clip.mp4", ""));

    assert_eq!(copied, vec![format!("COPIED 1 mycache/corrupted/{HOST}/objects/clip.mp4 - CORRUPT")]);
    assert_eq!(counters.corrupt, 1);
    assert!(harness.archived(&format!("{HOST}/objects/clip.mp4")).is_none());
    let video_log = fs::read_to_string(ArchiveLayout::new(harness.root(), DEFAULT_ARCHIVE_DIR).video_log()).unwrap();
    assert!(video_log.contains("moov atom not found"));
}

#[test]
fn test_mp3_keeps_the_larger_file() {
    let harness = Harness::new();
    harness.payload("AAAA_DAT", b"a fairly long song");
    harness.payload("BBBB_DAT", b"short");
    let url = "scee/objects/song.mp3";

    let (_, copied) = harness.run(&line("AAAA", url, ""));
    let outcomes = harness.process(&line("BBBB", url, ""));

    assert_eq!(copied, vec![format!("COPIED 1 mycache/{HOST}/objects/song.mp3 - .mp3")]);
    assert_eq!(outcomes, vec![Outcome::Skipped(SkipReason::NotLarger)]);
    assert_eq!(harness.archived(&format!("{HOST}/objects/song.mp3")).unwrap(), b"a fairly long song");
    assert_eq!(harness.log("dupes.log"), "");
}

#[test]
fn test_directory_in_main_slot_fails_the_candidate() {
    let harness = Harness::new();
    harness.seed(&format!("{HOST}/objects/notes.txt/inner.txt"), b"inside");
    harness.payload("AAAA_DAT", b"content");

    let outcomes = harness.process(&line("AAAA", "scee/objects/notes.txt", ""));

    assert_eq!(outcomes, vec![Outcome::Failed]);
    assert_eq!(harness.archived(&format!("{HOST}/objects/notes.txt/inner.txt")).unwrap(), b"inside");
    assert!(harness.archived(&format!("{HOST}/objects/notes-1.txt")).is_none());
}

#[test]
fn test_cdn_demotion_skips_taken_dated_slot() {
    let mut harness = Harness::new();
    harness.capabilities.cdn_log = Some(harness.date_log("cdn.log"));
    harness.payload("AAAA_DAT", b"<rss>first of the day</rss>");
    harness.payload("BBBB_DAT", b"<rss>second of the day</rss>");
    harness.payload("CCCC_DAT", b"<rss>next day</rss>");
    let manifest = [
        line("AAAA", "scee/objects/news.xml", "05Jan2012"),
        line("BBBB", "scee/objects/news.xml", "05Jan2012"),
        line("CCCC", "scee/objects/news.xml", "06Jan2012"),
    ]
    .join("\n");

    let (counters, copied) = harness.run(&manifest);

    assert_eq!(counters.copied, 3);
    assert_eq!(copied[1], format!("COPIED 2 mycache/{HOST}/objects/news_2012-01-05.xml  ( UNIQUE DUPE )"));
    assert_eq!(harness.archived(&format!("{HOST}/objects/news.xml")).unwrap(), b"<rss>next day</rss>");
    assert_eq!(
        harness.archived(&format!("{HOST}/objects/news_2012-01-05.xml")).unwrap(),
        b"<rss>second of the day</rss>"
    );
    assert_eq!(
        harness.archived(&format!("{HOST}/objects/news_2012-01-05-1.xml")).unwrap(),
        b"<rss>first of the day</rss>"
    );
    assert_eq!(harness.log("cdn.log"), format!("{HOST}/objects/news.xml\t20120106\tx\n"));

    let (counters, copied) = harness.run(&manifest);
    assert!(copied.is_empty());
    assert_eq!(counters.dupes, 3);
}

#[test]
fn test_cdn_versions_converge_regardless_of_order() {
    let older = b"<rss>older</rss>".as_slice();
    let newer = b"<rss>newer!</rss>".as_slice();
    let lines = [
        line("AAAA", "scee/objects/news.xml", "05Jan2012"),
        line("BBBB", "scee/objects/news.xml", "06Jan2012"),
    ];

    for manifest in [lines.join("\n"), [lines[1].clone(), lines[0].clone()].join("\n")] {
        let mut harness = Harness::new();
        harness.capabilities.cdn_log = Some(harness.date_log("cdn.log"));
        harness.payload("AAAA_DAT", older);
        harness.payload("BBBB_DAT", newer);

        let (counters, _) = harness.run(&manifest);

        assert_eq!(counters.copied, 2);
        assert_eq!(harness.archived(&format!("{HOST}/objects/news.xml")).unwrap(), newer);
        assert_eq!(harness.archived(&format!("{HOST}/objects/news_2012-01-05.xml")).unwrap(), older);
        assert!(harness.log("cdn.log").starts_with(&format!("{HOST}/objects/news.xml\t20120106")));
    }
}

#[test]
fn test_cdn_newer_date_promotes() {
    let mut harness = Harness::new();
    harness.capabilities.cdn_log = Some(harness.date_log("cdn.log"));
    harness.payload("AAAA_DAT", b"<rss>older</rss>");
    harness.payload("BBBB_DAT", b"<rss>newer!</rss>");

    let manifest = [line("AAAA", "scee/objects/news.xml", "05Jan2012"), line("BBBB", "scee/objects/news.xml", "06Jan2012")];
    let (_, copied) = harness.run(&manifest.join("\n"));

    assert_eq!(
        copied,
        vec![
            format!("COPIED 1 mycache/{HOST}/objects/news.xml"),
            format!("COPIED 2 mycache/{HOST}/objects/news.xml ( UNIQUE DUPE WITH NEW DATE 20120106 )"),
        ]
    );
    assert_eq!(harness.log("cdn.log"), format!("{HOST}/objects/news.xml\t20120106\tx\n"));
}

#[test]
fn test_cdn_undated_versions() {
    let mut harness = Harness::new();
    harness.capabilities.cdn_log = Some(harness.date_log("cdn.log"));
    harness.payload("AAAA_DAT", b"<rss>one</rss>");
    harness.payload("BBBB_DAT", b"<rss>two</rss>");
    harness.payload("CCCC_DAT", b"<rss>dated</rss>");
    let manifest = [
        line("AAAA", "scee/objects/news.xml", ""),
        line("BBBB", "scee/objects/news.xml", ""),
        line("CCCC", "scee/objects/news.xml", "05Jan2012"),
    ];

    let (_, copied) = harness.run(&manifest.join("\n"));

    assert_eq!(copied[1], format!("COPIED 2 mycache/{HOST}/objects/news-1.xml  ( UNIQUE DUPE )"));
    assert_eq!(harness.archived(&format!("{HOST}/objects/news.xml")).unwrap(), b"<rss>dated</rss>");
    assert_eq!(harness.archived(&format!("{HOST}/objects/news-1.xml")).unwrap(), b"<rss>two</rss>");
    assert_eq!(harness.archived(&format!("{HOST}/objects/news-2.xml")).unwrap(), b"<rss>one</rss>");
    assert_eq!(harness.log("cdn.log"), format!("{HOST}/objects/news.xml\t20120105\tx\n"));
}

#[test]
fn test_extensionless_payload_gets_sniffed_extension_once() {
    let harness = Harness::new();
    harness.payload("AAAA_DAT", br#"{"a":1}"#);
    let manifest = line("AAAA", "scee/objects/config", "");

    let (_, copied) = harness.run(&manifest);
    harness.run(&manifest);

    assert_eq!(copied, vec![format!("COPIED 1 mycache/{HOST}/objects/config.json")]);
    assert!(harness.archived(&format!("{HOST}/objects/config.json")).is_some());
    assert!(harness.archived(&format!("{HOST}/objects/config.json.json")).is_none());
    assert_eq!(harness.log("dupes.log"), format!("mycache\tCACHE/AAAA_DAT\t{HOST}/objects/config.json\n"));
}

#[test]
fn test_numbered_versions() {
    let harness = Harness::new();
    harness.payload("AAAA_DAT", b"small");
    harness.payload("BBBB_DAT", b"much larger");
    harness.payload("CCCC_DAT", b"medium");
    let manifest = [
        line("AAAA", "scee/objects/notes.txt", ""),
        line("BBBB", "scee/objects/notes.txt", ""),
        line("CCCC", "scee/objects/notes.txt", ""),
    ];

    let (_, copied) = harness.run(&manifest.join("\n"));

    assert_eq!(
        copied,
        vec![
            format!("COPIED 1 mycache/{HOST}/objects/notes.txt"),
            format!("COPIED 2 mycache/{HOST}/objects/notes.txt - UNIQUE DUPE ( NEW FILE SIZE )"),
            format!("COPIED 3 mycache/{HOST}/objects/notes-2.txt - UNIQUE DUPE"),
        ]
    );
    assert_eq!(harness.archived(&format!("{HOST}/objects/notes.txt")).unwrap(), b"much larger");
    assert_eq!(harness.archived(&format!("{HOST}/objects/notes-1.txt")).unwrap(), b"small");
    assert_eq!(harness.archived(&format!("{HOST}/objects/notes-2.txt")).unwrap(), b"medium");
}

#[test]
fn test_skip_incremental_overwrites_main() {
    let mut harness = Harness::new();
    harness.options.skip_incremental = true;
    harness.payload("AAAA_DAT", b"much larger");
    harness.payload("BBBB_DAT", b"small");

    harness.run(&[line("AAAA", "scee/objects/notes.txt", ""), line("BBBB", "scee/objects/notes.txt", "")].join("\n"));

    assert_eq!(harness.archived(&format!("{HOST}/objects/notes.txt")).unwrap(), b"small");
    assert!(harness.archived(&format!("{HOST}/objects/notes-1.txt")).is_none());
}

#[test]
fn test_exhausted_slots_fail_the_candidate() {
    let harness = Harness::new();
    harness.seed(&format!("{HOST}/objects/notes.txt"), b"the largest version of all");
    for n in 1..place::MAX_NUMBERED_SLOTS {
        harness.seed(&format!("{HOST}/objects/notes-{n}.txt"), format!("version {n}").as_bytes());
    }
    harness.payload("AAAA_DAT", b"tiny");

    let outcomes = harness.process(&line("AAAA", "scee/objects/notes.txt", ""));

    assert_eq!(outcomes, vec![Outcome::Failed]);
}

#[test]
fn test_missing_payload_goes_to_no_file_log() {
    let harness = Harness::new();

    let (counters, copied) = harness.run(&line("FFFF", "scee/objects/gone.xml", ""));

    assert!(copied.is_empty());
    assert_eq!(counters.lines, 1);
    assert_eq!(harness.log("nofile.log"), format!("mycache\tFFFF_INF\t{HOST}/objects/gone.xml\n"));
}

#[test]
fn test_missing_search_root_sends_lines_to_no_file_log() {
    let mut harness = Harness::new();
    harness.payload("FFFF_DAT", b"never indexed");
    harness.search_root = harness.root().join("missing");

    let (counters, copied) = harness.run(&line("FFFF", "scee/objects/gone.xml", ""));

    assert!(copied.is_empty());
    assert_eq!(counters.lines, 1);
    assert_eq!(counters.copied, 0);
    assert_eq!(harness.log("nofile.log"), format!("mycache\tFFFF_INF\t{HOST}/objects/gone.xml\n"));
}

#[test]
fn test_multiple_payloads_for_one_hash() {
    let harness = Harness::new();
    harness.payload("AAAA_DAT0", b"first");
    harness.payload("AAAA_DAT1", b"second");

    let (counters, copied) = harness.run(&line("AAAA", "scee/objects/notes.txt", ""));

    assert_eq!(counters.multi_match, 1);
    assert_eq!(counters.copied, 2);
    assert_eq!(copied.len(), 2);
}

#[test]
fn test_date_ordered_files() {
    let mut harness = Harness::new();
    harness.capabilities.dc_log = Some(harness.date_log("dc.log"));
    harness.payload("AAAA_DAT", b"february");
    harness.payload("BBBB_DAT", b"january");
    harness.payload("CCCC_DAT", b"march");
    harness.payload("DDDD_DAT", b"undated");
    let url = "scee/objects/scene.odc";

    assert!(matches!(harness.process(&line("AAAA", url, "01Feb2012"))[..], [Outcome::Copied { .. }]));
    assert_eq!(harness.process(&line("BBBB", url, "01Jan2012")), vec![Outcome::Skipped(SkipReason::NotNewer)]);
    assert_eq!(harness.process(&line("DDDD", url, "")), vec![Outcome::Skipped(SkipReason::NoDate)]);

    let (_, copied) = harness.run(&line("CCCC", url, "01Mar2012"));

    assert_eq!(copied, vec![format!("COPIED 1 mycache/{HOST}/objects/scene.odc ( NEWER DATE 20120301 )")]);
    assert_eq!(harness.archived(&format!("{HOST}/objects/scene.odc")).unwrap(), b"march");
    assert_eq!(harness.log("dc.log"), format!("{HOST}/objects/scene.odc\t20120301\tx\n"));
}

#[test]
fn test_dry_run_leaves_archive_untouched() {
    let mut harness = Harness::new();
    harness.dry_run = true;
    harness.capabilities.cdn_log = Some(harness.date_log("cdn.log"));
    harness.payload("AAAA_DAT", b"<rss>one</rss>");

    let (counters, copied) = harness.run(&line("AAAA", "scee/objects/news.xml", "05Jan2012"));

    assert_eq!(copied, vec![format!("[VERBOSE] COPIED 1 mycache/{HOST}/objects/news.xml")]);
    assert_eq!(counters.copied, 1);
    assert!(harness.archived(&format!("{HOST}/objects/news.xml")).is_none());
    assert_eq!(harness.log("cdn.log"), "");
}

#[test]
fn test_override_mode_records_new_files() {
    let mut harness = Harness::new();
    harness.capabilities.new_files_log = Some(AppendLog::new(harness.root().join("new.log")));
    harness.payload("AAAA_DAT", b"short");
    harness.payload("BBBB_DAT", b"a longer archive");

    let manifest = [line("AAAA", "scee/objects/pack.bar", "05Jan2012"), line("BBBB", "scee/objects/pack.bar", "")];
    let (_, copied) = harness.run(&manifest.join("\n"));

    assert_eq!(
        copied,
        vec![
            format!("COPIED 1 mycache/{HOST}/objects/pack.bar - .bar"),
            format!("COPIED 2 mycache/{HOST}/objects/pack.bar - .bar ( NEW FILE SIZE )"),
        ]
    );
    assert_eq!(
        harness.log("new.log"),
        format!("AAAA|{HOST}/objects/pack.bar|05Jan2012|mycache\nBBBB|{HOST}/objects/pack.bar||mycache\n")
    );
}

#[test]
fn test_cache_filter() {
    let mut harness = Harness::new();
    harness.options.cache = Some("other".to_string());
    harness.payload("AAAA_DAT", b"content");
    let mut started = false;

    let ctx = harness.context();
    let counters = run(&ctx, &[line("AAAA", "scee/objects/notes.txt", "")], |event| {
        started |= matches!(event, RunEvent::Started);
    });

    assert!(!started);
    assert_eq!(counters, Counters::default());
}

#[test]
fn test_filtered_cache_name_is_used_for_output() {
    let mut harness = Harness::new();
    harness.options.cache = Some("MyCache".to_string());
    harness.payload("AAAA_DAT", b"content");

    let (_, copied) = harness.run(&line("AAAA", "scee/objects/notes.txt", ""));

    assert_eq!(copied, vec![format!("COPIED 1 MyCache/{HOST}/objects/notes.txt")]);
}

#[test]
fn test_malformed_lines_are_ignored() {
    let harness = Harness::new();
    let (counters, _) = harness.run("not a manifest line\n\nA|B|C");
    assert_eq!(counters.lines, 0);
}
