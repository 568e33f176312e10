use std::collections::HashMap;

use weapp_core::conventions;
use weapp_core::lang::{languages, platforms, runtimes, toggles};

#[test]
fn language_spellings_unique_and_resolvable() {
    let mut seen: HashMap<String, languages::LanguageId> = HashMap::new();

    for info in languages::LANGUAGES {
        let item = info.item;
        assert_eq!(
            languages::from_str(item.canonical),
            Some(item.id),
            "language canonical spelling not resolvable: {}",
            item.canonical
        );
        assert_eq!(languages::as_str(item.id), item.canonical);
        assert_eq!(
            languages::from_str(&item.canonical.to_uppercase()),
            Some(item.id),
            "language lookup should ignore case: {}",
            item.canonical
        );

        for spelling in std::iter::once(item.canonical).chain(item.aliases.iter().copied()) {
            if let Some(prev) = seen.insert(spelling.to_ascii_lowercase(), item.id) {
                panic!("duplicate language spelling {spelling:?}: {prev:?} and {:?}", item.id);
            }
        }
    }
}

#[test]
fn platform_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, platforms::PlatformId> = HashMap::new();

    for info in platforms::PLATFORMS {
        assert_eq!(platforms::from_str(info.canonical), Some(info.id));
        assert_eq!(platforms::as_str(info.id), info.canonical);
        for &alias in info.aliases {
            assert_eq!(platforms::from_str(alias), Some(info.id), "platform alias not resolvable: {alias}");
        }
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate platform spelling {:?}: {prev:?} and {:?}", info.canonical, info.id);
        }
    }
}

#[test]
fn runtime_table_covers_every_pair() {
    if let Err(problems) = runtimes::validate() {
        panic!("runtime table is incomplete:\n{}", problems.join("\n"));
    }
    for &platform in platforms::ALL {
        for &language in languages::ALL {
            assert!(
                runtimes::lookup(platform, language).is_some(),
                "missing runtime for ({platform:?}, {language:?})"
            );
        }
    }
}

#[test]
fn toggle_spellings_do_not_overlap() {
    for t in toggles::TRUE_SPELLINGS {
        assert!(!toggles::FALSE_SPELLINGS.contains(t), "{t} is both true and false");
        assert_eq!(toggles::parse(t), Some(true));
        assert_eq!(toggles::parse(&t.to_uppercase()), Some(true));
    }
    for f in toggles::FALSE_SPELLINGS {
        assert_eq!(toggles::parse(f), Some(false));
    }
}

#[test]
fn local_only_names_are_distinct() {
    let mut names: Vec<&str> = conventions::LOCAL_ONLY_DIRS.to_vec();
    names.extend_from_slice(conventions::LOCAL_ONLY_FILES);
    let before = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(before, names.len(), "local-only names must be unique");
}

#[test]
fn project_names_stay_inside_the_parent() {
    assert!(conventions::is_valid_project_name(conventions::DEFAULT_PROJECT_NAME));
    assert!(conventions::is_valid_project_name("my..app"));
    for bad in ["", ".", "..", "../x", "a/b", "a\\b", "/abs"] {
        assert!(!conventions::is_valid_project_name(bad), "{bad:?} should be rejected");
    }
}
