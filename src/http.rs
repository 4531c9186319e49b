use std::io::{self, Read};

use serde::de::DeserializeOwned;

/// A thin GET-only wrapper around ureq. Both remote surfaces of this program
/// (the DreamHost API and the HTTP address lookup) speak plain GET requests,
/// so nothing more is exposed.
pub struct Request {
    inner: ureq::Request,
}

pub struct Response {
    reader: Box<dyn Read>,
}

pub enum Error {
    Status(u16, Response),
    Transport(Box<str>),
}

impl Request {
    pub fn get(url: &str) -> Self {
        Self {
            inner: ureq::get(url),
        }
    }

    pub fn query(mut self, param: &str, value: &str) -> Self {
        self.inner = self.inner.query(param, value);
        self
    }

    pub fn set(mut self, header: &str, value: &str) -> Self {
        self.inner = self.inner.set(header, value);
        self
    }

    pub fn call(self) -> Result<Response, Error> {
        self.inner
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, resp) => Error::Status(
                    code,
                    Response {
                        reader: resp.into_reader(),
                    },
                ),
                ureq::Error::Transport(tp) => Error::Transport(tp.to_string().into()),
            })
            .map(|resp| Response {
                reader: resp.into_reader(),
            })
    }
}

impl Response {
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, io::Error> {
        serde_json::from_reader(self.reader)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Reads the body as UTF-8 text, capped at 2 MiB.
    pub fn into_string(self) -> Result<String, io::Error> {
        let mut vec = Vec::with_capacity(1024);
        let read = self.reader.take(2 * 1024 * 1024).read_to_end(&mut vec)?;
        vec.resize(read, 0);
        String::from_utf8(vec).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
