#![allow(dead_code)]

use std::{
    fs,
    io::{BufRead, BufReader, Write},
    net::TcpListener,
    path::Path,
    thread::{self, JoinHandle},
    time::Duration,
};

use bionlp_ingest::data::medmentions::{
    ALL_IDS_FILE, CORPUS_FILE, DEV_IDS_FILE, TEST_IDS_FILE, TRAIN_IDS_FILE,
};

pub const CORPUS: &str = "\
111|t|Cancer
111|a|Cancer is bad.
111\t0\t6\tCancer\tT191,T192\tC0006826

222|t|Aspirin helps
222|a|Aspirin reduces fever.
222\t0\t7\tAspirin\tT121\tC0004057
222\t14\t21\tAspirin\tT121\tC0004057

333|t|Fever study
333|a|Patients with fever.
333\t0\t5\tFever\tT184\tC0015967

444|t|Unlisted
444|a|Not in any split.
444\t0\t8\tUnlisted\tT121\tC0000000
";

/// Write a complete MedMentions directory: train = {111, 333}, dev = {222},
/// test = {555}; 444 is in no split.
pub fn write_medmentions(dir: &Path) {
    fs::write(dir.join(CORPUS_FILE), CORPUS).unwrap();
    fs::write(dir.join(ALL_IDS_FILE), "111\n222\n333\n444\n").unwrap();
    fs::write(dir.join(TRAIN_IDS_FILE), "111\n333\n").unwrap();
    fs::write(dir.join(DEV_IDS_FILE), " 222 \n").unwrap();
    fs::write(dir.join(TEST_IDS_FILE), "555\n").unwrap();
}

pub const BIO_TSV: &str = "\
-DOCSTART-\tO

John\tB-PER
Smith\tI-PER
died\tO

Aspirin\tB-Chemical
helps\tO
";

/// Answer exactly one HTTP request on a loopback port, then stop listening.
/// Returns the server's base URL and the thread serving it. A `pause` writes
/// the body one byte at a time with that delay between bytes.
pub fn serve_once(
    status: &'static str,
    body: Vec<u8>,
    pause: Option<Duration>,
) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        while request.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
            line.clear();
        }

        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).unwrap();
        match pause {
            None => stream.write_all(&body).unwrap(),
            Some(pause) => {
                for byte in &body {
                    stream.write_all(std::slice::from_ref(byte)).unwrap();
                    stream.flush().unwrap();
                    thread::sleep(pause);
                }
            }
        }
    });
    (base, handle)
}
