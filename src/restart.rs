use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use crate::error::{Error, Result};




/**
 * An explicit store of named restart records. Each record is encoded as CBOR
 * when it is put into the database, and the whole database can be written
 * to, and read back from, any byte stream. Objects that persist their state
 * are handed the database by their owner; there is no global registry.
 */
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RestartDatabase {
    records: BTreeMap<String, Vec<u8>>,
}




// ============================================================================
impl RestartDatabase {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /**
     * Encode a record and store it under the given name, replacing any
     * existing record with that name.
     */
    pub fn put<T: Serialize>(&mut self, name: &str, record: &T) -> Result<()> {
        let mut buffer = Vec::new();
        ciborium::ser::into_writer(record, &mut buffer).map_err(|e| Error::Codec(format!("{:?}", e)))?;
        self.records.insert(name.to_string(), buffer);
        Ok(())
    }

    /**
     * Decode the record stored under the given name.
     */
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let bytes = self.records
            .get(name)
            .ok_or_else(|| Error::RestartRecordMissing { object: name.to_string() })?;
        ciborium::de::from_reader(bytes.as_slice()).map_err(|e| Error::restart(name, format!("{:?}", e)))
    }

    pub fn remove(&mut self, name: &str) {
        self.records.remove(name);
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        ciborium::ser::into_writer(self, writer).map_err(|e| Error::Codec(format!("{:?}", e)))
    }

    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        ciborium::de::from_reader(reader).map_err(|e| Error::Codec(format!("{:?}", e)))
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_from(BufReader::new(File::open(path)?))
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use serde::{Deserialize, Serialize};
    use super::RestartDatabase;
    use crate::error::Error;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        version: u32,
        values: Vec<f64>,
    }

    #[test]
    fn records_survive_encoding_of_the_whole_database() {
        let record = Record { version: 3, values: vec![0.1, 1.0 / 3.0, -2.5e-300] };
        let mut db = RestartDatabase::new();
        db.put("geometry", &record).unwrap();

        let mut bytes = Vec::new();
        db.write_to(&mut bytes).unwrap();
        let restored = RestartDatabase::read_from(bytes.as_slice()).unwrap();

        assert_eq!(restored, db);
        assert_eq!(restored.get::<Record>("geometry").unwrap(), record);
        assert_eq!(restored.names().collect::<Vec<_>>(), vec!["geometry"]);
    }

    #[test]
    fn missing_record_is_reported_by_name() {
        let db = RestartDatabase::new();
        match db.get::<Record>("absent") {
            Err(Error::RestartRecordMissing { object }) => assert_eq!(object, "absent"),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
