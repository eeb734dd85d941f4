use almacen::collection::Document;
use almacen::common::Value;
use almacen::doc;
use almacen::errors::{AlmacenError, AlmacenResult, ErrorKind};
use almacen::store::memory::InMemoryStoreModule;
use almacen::store::{DocumentStore, StoreModule};
use almacen_fjall_adapter::FjallModule;
use rand::Rng;
use std::backtrace::Backtrace;
use std::time::{Duration, Instant};
use std::{env, fs, thread};

/// Runs a test with retry logic and error handling.
/// Tests run on the current thread to avoid thread exhaustion when running many tests in parallel.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> AlmacenResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> AlmacenResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> AlmacenResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    const MAX_RETRIES: u32 = 3;
    let mut last_error: Option<String> = None;
    let mut last_backtrace: Option<String> = None;

    for attempt in 1..=MAX_RETRIES {
        let start_time = Instant::now();

        let result = std::panic::catch_unwind(|| {
            let backtrace = Backtrace::capture();
            match before() {
                Ok(ctx) => match test(ctx.clone()) {
                    Ok(_) => after(ctx)
                        .map_err(|e| (format!("After run failed: {:?}", e), backtrace.to_string())),
                    Err(e) => {
                        let _ = after(ctx);
                        Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                    }
                },
                Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
            }
        });

        let elapsed = start_time.elapsed();

        let failure = match result {
            Ok(Ok(_)) => return,
            Ok(Err((e, bt))) => {
                last_backtrace = Some(bt);
                e
            }
            Err(panic_err) => {
                let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    s.clone()
                } else {
                    format!("Unknown panic: {:?}", panic_err.type_id())
                };
                last_backtrace = Some(Backtrace::capture().to_string());
                format!("Panic: {}", err_msg)
            }
        };

        if attempt < MAX_RETRIES {
            eprintln!(
                "\n========== Test Attempt {}/{} Failed (took {:?}) ==========",
                attempt, MAX_RETRIES, elapsed
            );
            eprintln!("Error: {}", failure);
            eprintln!("Retrying in {}ms...\n", 100 * attempt);
            thread::sleep(Duration::from_millis(100 * attempt as u64));
        }
        last_error = Some(failure);
    }

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {} attempts", MAX_RETRIES);
    eprintln!("Last error: {}", last_error.as_deref().unwrap_or("Unknown"));
    if let Some(bt) = &last_backtrace {
        if !bt.is_empty() && !bt.contains("disabled") {
            eprintln!("\nBacktrace:\n{}", bt);
        }
    }
    eprintln!("=====================================================\n");

    panic!(
        "Test failed after {} attempts. Last error: {}",
        MAX_RETRIES,
        last_error.unwrap_or_default()
    );
}

#[derive(Clone)]
pub struct TestContext {
    path: Option<String>,
    store: DocumentStore,
}

impl TestContext {
    pub fn new(path: Option<String>, store: DocumentStore) -> Self {
        Self { path, store }
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn store(&self) -> DocumentStore {
        self.store.clone()
    }
}

/// Storage engines the suites can run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Fjall,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Memory, Backend::Fjall];
}

pub fn random_path() -> String {
    let id = uuid::Uuid::new_v4();
    let temp_dir = env::temp_dir();
    temp_dir.join(format!("almacen_test_{}", id)).to_string_lossy().to_string()
}

/// Opens a fresh store on `backend`.
pub fn create_backend_context(backend: Backend) -> AlmacenResult<TestContext> {
    match backend {
        Backend::Memory => {
            let store = InMemoryStoreModule::with_config().build().get_store()?;
            store.open_or_create()?;
            Ok(TestContext::new(None, store))
        }
        Backend::Fjall => {
            const MAX_ATTEMPTS: u32 = 3;
            let mut last_error: Option<AlmacenError> = None;

            for attempt in 1..=MAX_ATTEMPTS {
                let path = random_path();
                match open_fjall_store(&path) {
                    Ok(store) => return Ok(TestContext::new(Some(path), store)),
                    Err(e) => {
                        let _ = fs::remove_dir_all(&path);
                        if attempt < MAX_ATTEMPTS {
                            eprintln!(
                                "Warning: Failed to create test context (attempt {}/{}): {:?}",
                                attempt, MAX_ATTEMPTS, e
                            );
                            thread::sleep(Duration::from_millis(50 * attempt as u64));
                        }
                        last_error = Some(e);
                    }
                }
            }

            Err(last_error.unwrap_or_else(|| {
                AlmacenError::new("Failed to create test context", ErrorKind::InternalError)
            }))
        }
    }
}

/// Opens a fjall store at `path`, keeping anything already stored there.
pub fn open_fjall_store(path: &str) -> AlmacenResult<DocumentStore> {
    // low_memory_preset keeps the worker thread count down across parallel tests
    let store = FjallModule::with_config()
        .db_path(path)
        .low_memory_preset()
        .build()
        .get_store()?;
    store.open_or_create()?;
    Ok(store)
}

#[cfg(not(feature = "memory"))]
pub fn create_test_context() -> AlmacenResult<TestContext> {
    create_backend_context(Backend::Fjall)
}

#[cfg(feature = "memory")]
pub fn create_test_context() -> AlmacenResult<TestContext> {
    create_backend_context(Backend::Memory)
}

/// Closes the store and removes its directory, if it has one.
pub fn cleanup(ctx: TestContext) -> AlmacenResult<()> {
    if let Err(e) = ctx.store().close() {
        eprintln!("Warning: Failed to close store: {:?}", e);
    }

    let Some(path) = ctx.path().map(str::to_string) else {
        return Ok(());
    };
    drop(ctx);

    let max_retries = 10;
    for retry in 0..max_retries {
        if !std::path::Path::new(&path).exists() {
            return Ok(());
        }
        match fs::remove_dir_all(&path) {
            Ok(_) => return Ok(()),
            Err(_) if retry < max_retries - 1 => {
                thread::sleep(Duration::from_millis(50 * (retry as u64 + 1)));
            }
            Err(e) => {
                eprintln!("Warning: Failed to remove {} after {} attempts: {}", path, max_retries, e);
            }
        }
    }
    Ok(())
}

/// The canonical nested document used across the suites.
pub fn nested_doc(id: &str) -> Document {
    doc!{
        "_id": id,
        "x": {
            "y": {
                "z": 12
            }
        },
        "a": "A"
    }
}

/// A document of random scalars and one nested level, keyed by `id`.
pub fn random_doc(id: &str) -> Document {
    let mut rng = rand::rng();
    let mut document = doc!{
        "_id": id,
        "count": (rng.random_range(0..1000i64)),
        "ratio": (rng.random::<f64>()),
        "active": (rng.random::<bool>()),
        "name": (uuid::Uuid::new_v4().to_string()),
    };
    let mut nested = Document::new();
    for i in 0..rng.random_range(1..5) {
        nested.put(format!("f{}", i), Value::from(rng.random_range(0..100i64)));
    }
    document.put("nested", Value::Document(nested));
    document
}
