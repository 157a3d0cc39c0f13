use rstest::rstest;
use servotune_hardware::FileStore;
use servotune_traits::{CalibrationStore, RECORD_LEN};

const SEED: [u8; RECORD_LEN] = [
    0x58, 0x02, 0x58, 0x02, 0x58, 0x02, // mins: 600
    0x60, 0x09, 0x60, 0x09, 0x60, 0x09, // maxes: 2400
];

#[test]
fn open_seeds_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cal.bin");

    let mut store = FileStore::open(&path, &SEED).expect("open");
    assert_eq!(store.read_record().expect("read"), SEED);
    assert_eq!(std::fs::read(&path).expect("file"), SEED);
}

#[test]
fn write_then_read_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cal.bin");
    let mut store = FileStore::open(&path, &SEED).expect("open");

    let mut record = SEED;
    record[0] = 0xAA;
    record[11] = 0x55;
    store.write_record(&record).expect("write");
    assert_eq!(store.read_record().expect("read"), record);

    // reopening does not clobber a full record
    drop(store);
    let mut store = FileStore::open(&path, &SEED).expect("reopen");
    assert_eq!(store.read_record().expect("read"), record);
}

#[rstest]
#[case(0)]
#[case(5)]
#[case(11)]
fn open_reseeds_truncated_file(#[case] len: usize) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cal.bin");
    std::fs::write(&path, vec![0xFFu8; len]).expect("truncate");

    let mut store = FileStore::open(&path, &SEED).expect("open");
    assert_eq!(store.read_record().expect("read"), SEED);
}

#[test]
fn extra_trailing_bytes_are_ignored_on_read() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cal.bin");
    let mut bytes = SEED.to_vec();
    bytes.extend_from_slice(&[1, 2, 3]);
    std::fs::write(&path, &bytes).expect("write");

    let mut store = FileStore::open(&path, &SEED).expect("open");
    assert_eq!(store.read_record().expect("read"), SEED);
}
