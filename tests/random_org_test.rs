use boxshelf::adapters::{InMemoryCatalog, RandomOrgRandom};
use boxshelf::core::RandomSource;
use boxshelf::{BoxshelfError, ReadingList};
use httpmock::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn source(server: &MockServer) -> RandomOrgRandom {
    RandomOrgRandom::new(&server.base_url(), Duration::from_secs(5)).unwrap()
}

#[test]
fn test_integer_draw() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/integers/")
            .query_param("min", "1")
            .query_param("max", "4")
            .query_param("format", "plain");
        then.status(200).body("3\n");
    });

    let value = source(&server).next_in_range(1, 4).unwrap();

    api_mock.assert();
    assert_eq!(value, 3);
}

#[test]
fn test_decimal_draw() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/decimal-fractions/").query_param("num", "1");
        then.status(200).body("0.251937\n");
    });

    let value = source(&server).next_unit().unwrap();

    api_mock.assert();
    assert!((value - 0.251937).abs() < 1e-12);
}

#[test]
fn test_server_error_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/integers/");
        then.status(503);
    });

    let err = source(&server).next_in_range(1, 2).unwrap_err();
    assert!(matches!(err, BoxshelfError::RandomSourceError { .. }));
}

#[test]
fn test_unparsable_and_out_of_range_bodies() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/integers/");
        then.status(200).body("Error: too many requests");
    });
    server.mock(|when, then| {
        when.method(GET).path("/decimal-fractions/");
        then.status(200).body("1.5");
    });

    let random = source(&server);
    assert!(matches!(
        random.next_in_range(1, 2).unwrap_err(),
        BoxshelfError::RandomSourceError { .. }
    ));
    assert!(matches!(
        random.next_unit().unwrap_err(),
        BoxshelfError::RandomSourceError { .. }
    ));
}

#[test]
fn test_reading_list_random_position_via_http() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/integers/").query_param("max", "2");
        then.status(200).body("2");
    });

    let catalog = Arc::new(InMemoryCatalog::new());
    let first = catalog.create_book("George Orwell", "1984", 1949, "Dystopian", 328).unwrap();
    let second = catalog
        .create_book("Aldous Huxley", "Brave New World", 1932, "Science Fiction", 311)
        .unwrap();

    let mut list = ReadingList::new(catalog, source(&server), boxshelf::adapters::SystemClock);
    list.add(first.id).unwrap();
    list.add(second.id).unwrap();

    list.go_to_random_position().unwrap();
    assert_eq!(list.get_current().unwrap().title, "Brave New World");
}
