#![allow(dead_code)]

pub mod site {
    use routewire::Settings;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// A throwaway site root with configuration files written under it.
    pub struct TestSite {
        dir: TempDir,
    }

    impl TestSite {
        pub fn new() -> Self {
            Self {
                dir: TempDir::new().expect("create temp site"),
            }
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        /// Write `content` to `relative` under the site root, creating
        /// parent directories.
        pub fn write(&self, relative: &str, content: &str) -> PathBuf {
            let path = self.dir.path().join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create config dir");
            }
            fs::write(&path, content).expect("write config file");
            path
        }

        pub fn settings(&self, document_uri: &str) -> Arc<Settings> {
            Arc::new(Settings::new(self.root(), "example.org", document_uri))
        }
    }
}

pub mod services {
    use routewire::TypeRegistry;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    pub struct Formatter {
        pub prefix: String,
    }

    impl Formatter {
        pub fn format(&self, text: &str) -> String {
            format!("{}{text}", self.prefix)
        }
    }

    pub struct Greeter {
        pub formatter: Arc<Formatter>,
        pub text: String,
    }

    impl Greeter {
        pub fn greet(&self) -> String {
            self.formatter.format(&self.text)
        }
    }

    pub struct Database {
        pub dsn: String,
        pub mode: String,
    }

    /// Counts how many services the registry has constructed.
    #[derive(Default)]
    pub struct BuildCounter(AtomicUsize);

    impl BuildCounter {
        pub fn get(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }

        fn bump(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Registry with `Formatter(prefix?)`, `Greeter(formatter, text)` and
    /// `Database(dsn, mode)`.
    pub fn registry(counter: &Arc<BuildCounter>) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        let (c1, c2, c3) = (
            Arc::clone(counter),
            Arc::clone(counter),
            Arc::clone(counter),
        );
        registry
            .register_service("Formatter", move |args| {
                c1.bump();
                let prefix = match args.get(0) {
                    Some(arg) => arg.as_str().unwrap_or_default().to_string(),
                    None => String::new(),
                };
                Ok(Formatter { prefix })
            })
            .register_service("Greeter", move |args| {
                c2.bump();
                Ok(Greeter {
                    formatter: args.object::<Formatter>(0)?,
                    text: args.string(1)?,
                })
            })
            .register_service("Database", move |args| {
                c3.bump();
                Ok(Database {
                    dsn: args.string(0)?,
                    mode: args.string(1)?,
                })
            });
        registry
    }
}
