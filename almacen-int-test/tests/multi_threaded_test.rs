use almacen::common::Value;
use almacen::context::Context;
use almacen::doc;
use almacen::errors::ErrorKind;
use almacen_int_test::test_util::{cleanup, create_test_context, random_doc, run_test};
use rand::Rng;
use std::sync::{Arc, Barrier};
use std::thread;

#[ctor::ctor]
fn init() {
    colog::init();
}

#[test]
fn test_multi_threaded_save() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let num_threads = 5;
            let saves_per_thread = 20;
            let barrier = Arc::new(Barrier::new(num_threads));

            let mut handles = vec![];
            for thread_id in 0..num_threads {
                let store = store.clone();
                let barrier = Arc::clone(&barrier);
                handles.push(thread::spawn(move || {
                    barrier.wait();
                    let c = Context::new();
                    for i in 0..saves_per_thread {
                        let id = format!("thread_{}_seq_{}", thread_id, i);
                        store.save(&c, "test", random_doc(&id)).unwrap();
                    }
                }));
            }
            for handle in handles {
                handle.join().unwrap();
            }

            let all = store.find_all(&Context::new(), "test")?;
            assert_eq!(all.len(), num_threads * saves_per_thread);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_multi_threaded_field_updates_on_one_document() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let c = Context::new();
            store.save(&c, "test", doc!{ "_id": "shared", "slots": {} })?;

            let num_threads = 6;
            let updates_per_thread = 10;
            let barrier = Arc::new(Barrier::new(num_threads));

            let mut handles = vec![];
            for thread_id in 0..num_threads {
                let store = store.clone();
                let barrier = Arc::clone(&barrier);
                handles.push(thread::spawn(move || {
                    barrier.wait();
                    let c = Context::new();
                    for i in 0..updates_per_thread {
                        let path = format!("slots.t{}_{}", thread_id, i);
                        store.update_field(&c, "test", "shared", &path, Value::from(i)).unwrap();
                    }
                }));
            }
            for handle in handles {
                handle.join().unwrap();
            }

            let slots = store.find_field(&c, "test", "shared", "slots")?;
            assert_eq!(
                slots.as_document().map(|d| d.size()),
                Some(num_threads * updates_per_thread)
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_readers_never_observe_partial_writes() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let c = Context::new();
            store.save(&c, "test", doc!{ "_id": "k", "left": 0, "right": 0 })?;

            let writer = {
                let store = store.clone();
                thread::spawn(move || {
                    let c = Context::new();
                    for i in 1..200i64 {
                        store
                            .save(&c, "test", doc!{ "_id": "k", "left": i, "right": i })
                            .unwrap();
                    }
                })
            };

            let readers: Vec<_> = (0..3)
                .map(|_| {
                    let store = store.clone();
                    thread::spawn(move || {
                        let c = Context::new();
                        for _ in 0..200 {
                            let doc = store.find_by_id(&c, "test", "k").unwrap();
                            assert_eq!(doc.get("left"), doc.get("right"));
                        }
                    })
                })
                .collect();

            writer.join().unwrap();
            for reader in readers {
                reader.join().unwrap();
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_multi_threaded_mixed_operations() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let num_threads = 4;
            let ops_per_thread = 50;
            let barrier = Arc::new(Barrier::new(num_threads));

            let mut handles = vec![];
            for thread_id in 0..num_threads {
                let store = store.clone();
                let barrier = Arc::clone(&barrier);
                handles.push(thread::spawn(move || {
                    barrier.wait();
                    let c = Context::new();
                    let mut rng = rand::rng();
                    for i in 0..ops_per_thread {
                        let id = format!("{}-{}", thread_id, rng.random_range(0..10));
                        let result = match rng.random_range(0..6) {
                            0 => store.save(&c, "mixed", random_doc(&id)),
                            1 => store.delete(&c, "mixed", &id),
                            2 => store.find_by_id(&c, "mixed", &id).map(|_| ()),
                            3 => store.find_field(&c, "mixed", &id, "nested.f0").map(|_| ()),
                            4 => store.update_field(&c, "mixed", &id, "nested.f9", Value::from(i)),
                            _ => store.delete_field(&c, "mixed", &id, "nested.f0"),
                        };
                        if let Err(e) = result {
                            assert!(
                                matches!(e.kind(), ErrorKind::NotFound | ErrorKind::TraversingObject),
                                "unexpected error {:?}",
                                e
                            );
                        }
                    }
                }));
            }
            for handle in handles {
                handle.join().unwrap();
            }

            for doc in store.find_all(&Context::new(), "mixed")? {
                assert!(doc.id().is_ok());
                assert!(doc.get("nested").map(|n| n.is_document()).unwrap_or(false));
            }
            Ok(())
        },
        cleanup,
    )
}
