use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Last-applied IP per domain, serialized as a flat JSON object with string
/// keys and values. There is no schema version; the file is cheap to rebuild.
pub type DnsState = HashMap<Box<str>, Box<str>>;

/// Loads the state file, falling back to the empty map on ANY failure -
/// missing file, unreadable file, corrupt JSON. A lost cache only costs one
/// extra round of provider calls on the next update, so it is treated as
/// "no prior state" rather than an error.
pub fn load_or_default(path: &Path) -> DnsState {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return DnsState::new(),
    };

    from_reader(BufReader::new(file)).unwrap_or_default()
}

pub fn from_reader<R: Read>(reader: R) -> io::Result<DnsState> {
    serde_json::from_reader(reader).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub fn write_to<W: Write>(mut writer: W, state: &DnsState) -> io::Result<()> {
    serde_json::to_writer(&mut writer, state)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writer.flush()
}

/// Overwrites the file with the full mapping. Not atomic; overlapping runs
/// against the same file are out of scope.
pub fn save(path: &Path, state: &DnsState) -> io::Result<()> {
    let file = File::create(path)?;
    write_to(BufWriter::new(file), state)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn sample_state() -> DnsState {
        let mut state = DnsState::new();
        state.insert("host.example.com".into(), "203.0.113.5".into());
        state.insert("other.example.org".into(), "2001:db8::17".into());
        state
    }

    #[test]
    fn reversible() {
        let state = sample_state();

        let mut buffer = Cursor::new(vec![]);
        write_to(&mut buffer, &state).unwrap();
        assert!(buffer.position() > 0);

        buffer.set_position(0);
        let state_read = from_reader(buffer).unwrap();

        assert_eq!(state, state_read);
    }

    #[test]
    fn corrupt_json_is_an_error_from_the_reader() {
        let buffer = Cursor::new(b"{ \"host.example.com\": ".to_vec());
        assert!(from_reader(buffer).is_err());

        let buffer = Cursor::new(b"[1, 2, 3]".to_vec());
        assert!(from_reader(buffer).is_err());
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dns-record.txt");

        assert!(load_or_default(&path).is_empty());
    }

    #[test]
    fn corrupt_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dns-record.txt");
        std::fs::write(&path, "definitely not json").unwrap();

        assert!(load_or_default(&path).is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dns-record.txt");

        let state = sample_state();
        save(&path, &state).unwrap();

        assert_eq!(load_or_default(&path), state);
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dns-record.txt");

        save(&path, &sample_state()).unwrap();

        let mut rewritten = DnsState::new();
        rewritten.insert("host.example.com".into(), "203.0.113.99".into());
        save(&path, &rewritten).unwrap();

        assert_eq!(load_or_default(&path), rewritten);
    }
}
