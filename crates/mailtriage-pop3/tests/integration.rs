//! Integration tests for the POP3 client.
//!
//! These tests script the server side with `tokio_test` mocks, so every
//! byte the client sends is checked against the expected command.

use std::time::Duration;

use proptest::prelude::*;
use tokio_test::io::Builder;

use mailtriage_pop3::parser::parse_reply;
use mailtriage_pop3::{Client, Error};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_full_session() {
    let mock = Builder::new()
        .read(b"+OK POP3 server ready\r\n")
        .write(b"USER alice\r\n")
        .read(b"+OK alice is welcome\r\n")
        .write(b"PASS hunter2\r\n")
        .read(b"+OK maildrop locked and ready\r\n")
        .write(b"STAT\r\n")
        .read(b"+OK 2 320\r\n")
        .write(b"TOP 2 0\r\n")
        .read(b"+OK top of message follows\r\n")
        .read(b"From: \"Shop\" <deals@shop.example>\r\n")
        .read(b"Subject: Your order\r\n")
        .read(b"\r\n")
        .read(b".\r\n")
        .write(b"DELE 2\r\n")
        .read(b"+OK message 2 deleted\r\n")
        .write(b"QUIT\r\n")
        .read(b"+OK bye\r\n")
        .build();

    let client = Client::from_stream(mock, TIMEOUT).await.unwrap();
    let mut client = client.login("alice", "hunter2").await.unwrap();

    let stat = client.stat().await.unwrap();
    assert_eq!(stat.count, 2);
    assert_eq!(stat.size, 320);

    let header = client.top(2, 0).await.unwrap();
    assert_eq!(
        header,
        b"From: \"Shop\" <deals@shop.example>\r\nSubject: Your order\r\n\r\n"
    );

    client.dele(2).await.unwrap();
    client.quit().await.unwrap();
}

#[tokio::test]
async fn test_top_unknown_message() {
    let mock = Builder::new()
        .read(b"+OK ready\r\n")
        .write(b"USER bob\r\n")
        .read(b"+OK\r\n")
        .write(b"PASS pw\r\n")
        .read(b"+OK\r\n")
        .write(b"TOP 99 0\r\n")
        .read(b"-ERR no such message\r\n")
        .write(b"NOOP\r\n")
        .read(b"+OK\r\n")
        .build();

    let client = Client::from_stream(mock, TIMEOUT).await.unwrap();
    let mut client = client.login("bob", "pw").await.unwrap();

    let err = client.top(99, 0).await.unwrap_err();
    assert!(matches!(err, Error::Server(ref text) if text == "no such message"));

    // The session is still usable after a -ERR
    client.noop().await.unwrap();
}

#[tokio::test]
async fn test_user_rejected() {
    let mock = Builder::new()
        .read(b"+OK ready\r\n")
        .write(b"USER nobody\r\n")
        .read(b"-ERR unknown mailbox\r\n")
        .build();

    let client = Client::from_stream(mock, TIMEOUT).await.unwrap();
    let err = client.login("nobody", "pw").await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
}

#[tokio::test]
async fn test_disconnect_mid_body() {
    let mock = Builder::new()
        .read(b"+OK ready\r\n")
        .write(b"USER bob\r\n")
        .read(b"+OK\r\n")
        .write(b"PASS pw\r\n")
        .read(b"+OK\r\n")
        .write(b"TOP 1 0\r\n")
        .read(b"+OK\r\n")
        .read(b"Subject: cut")
        .build();

    let client = Client::from_stream(mock, TIMEOUT).await.unwrap();
    let mut client = client.login("bob", "pw").await.unwrap();

    let err = client.top(1, 0).await.unwrap_err();
    assert!(err.is_connection_lost());
}

proptest! {
    #[test]
    fn parse_reply_never_panics(line in "\\PC*") {
        let _ = parse_reply(&line);
    }

    #[test]
    fn ok_replies_keep_their_text(text in "[ -~]{0,64}") {
        let reply = parse_reply(&format!("+OK {text}")).unwrap();
        prop_assert!(reply.is_ok());
        prop_assert_eq!(reply.text, text.trim_start());
    }
}
