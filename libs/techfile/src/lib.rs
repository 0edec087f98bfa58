//! The technology-file loader: a section-oriented configuration format
//! shared by every other engine in this crate (`spec.md` §4.1).
//!
//! A technology file is a flat text format divided into named sections
//! (`cif`, `planes`, `types`, `contact`, `styles`, ...). Each subsystem that
//! cares about a section registers a [`SectionClient`] for it; the loader
//! owns nothing about what a section *means*, only how it's framed,
//! included, and sequenced against other sections' prerequisites.

#![warn(missing_docs)]

mod client;
mod loader;
mod section;

pub use client::{Args, SectionClient};
pub use loader::{LoadError as TechLoadError, TechLoader};
pub use section::{SectionId, SectionMask, MAX_SECTIONS};

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct Recorder {
        lines: Vec<Vec<String>>,
        inits: usize,
        finishes: usize,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                lines: Vec::new(),
                inits: 0,
                finishes: 0,
            }
        }
    }

    impl SectionClient for Recorder {
        fn init(&mut self) {
            self.inits += 1;
        }
        fn line(&mut self, args: Args<'_>) -> bool {
            self.lines.push(args.iter().map(|s| s.to_string()).collect());
            true
        }
        fn finish(&mut self) {
            self.finishes += 1;
        }
    }

    fn write_tech(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = fs_create(&path);
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn fs_create(path: &std::path::Path) -> std::fs::File {
        std::fs::File::create(path).unwrap()
    }

    #[test]
    fn loads_a_single_section() {
        let dir = std::env::temp_dir().join("techfile_test_single");
        std::fs::create_dir_all(&dir).unwrap();
        let path = write_tech(
            &dir,
            "a.tech",
            "planes\n\
             active\n\
             metal1\n\
             end\n",
        );

        let mut loader = TechLoader::new();
        let recorder = std::rc::Rc::new(std::cell::RefCell::new(Recorder::new()));
        struct Proxy(std::rc::Rc<std::cell::RefCell<Recorder>>);
        impl SectionClient for Proxy {
            fn init(&mut self) {
                self.0.borrow_mut().init();
            }
            fn line(&mut self, args: Args<'_>) -> bool {
                self.0.borrow_mut().line(args)
            }
            fn finish(&mut self) {
                self.0.borrow_mut().finish();
            }
        }
        loader
            .add_client(
                "planes",
                Box::new(Proxy(recorder.clone())),
                SectionMask::NONE,
                false,
            )
            .unwrap();

        loader.load(Some(&path), SectionMask::NONE).unwrap();

        let rec = recorder.borrow();
        assert_eq!(rec.inits, 1);
        assert_eq!(rec.finishes, 1);
        assert_eq!(rec.lines, vec![vec!["active".to_string()], vec!["metal1".to_string()]]);
    }

    #[test]
    fn missing_prerequisite_skips_section() {
        let dir = std::env::temp_dir().join("techfile_test_prereq");
        std::fs::create_dir_all(&dir).unwrap();
        let path = write_tech(
            &dir,
            "b.tech",
            "cif\n\
             layer m1 1\n\
             end\n",
        );

        let mut loader = TechLoader::new();
        let planes_id = loader
            .add_client("planes", Box::new(Recorder::new()), SectionMask::NONE, false)
            .unwrap();
        loader
            .add_client("cif", Box::new(Recorder::new()), planes_id.mask(), false)
            .unwrap();

        let err = loader.load(Some(&path), SectionMask::NONE).unwrap_err();
        assert!(matches!(err, TechLoadError::MissingRequiredSection(_)));
    }

    #[test]
    fn unknown_section_is_skipped_with_body_intact() {
        let dir = std::env::temp_dir().join("techfile_test_unknown");
        std::fs::create_dir_all(&dir).unwrap();
        let path = write_tech(
            &dir,
            "c.tech",
            "bogus\n\
             whatever here\n\
             end\n\
             planes\n\
             active\n\
             end\n",
        );

        let mut loader = TechLoader::new();
        loader
            .add_client("planes", Box::new(Recorder::new()), SectionMask::NONE, false)
            .unwrap();

        loader.load(Some(&path), SectionMask::NONE).unwrap();
    }

    #[test]
    fn section_mask_reload_skips_everything_else() {
        let dir = std::env::temp_dir().join("techfile_test_reload");
        std::fs::create_dir_all(&dir).unwrap();
        let path = write_tech(
            &dir,
            "d.tech",
            "planes\n\
             active\n\
             end\n\
             cif\n\
             layer m1 1\n\
             end\n",
        );

        let mut loader = TechLoader::new();
        let planes_id = loader
            .add_client("planes", Box::new(Recorder::new()), SectionMask::NONE, false)
            .unwrap();
        loader
            .add_client("cif", Box::new(Recorder::new()), planes_id.mask(), false)
            .unwrap();

        loader.load(Some(&path), SectionMask::NONE).unwrap();

        let (skip_mask, _dependents) = loader.section_mask("cif").unwrap();
        loader.load(None, skip_mask).unwrap();
    }
}
