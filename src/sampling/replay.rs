use std::fs::File;
use std::io;
use std::path::Path;

use super::LineSampler;

// -----------------------------------------------------------------------------
// CSV REPLAY OF RECORDED LINE STATES
// -----------------------------------------------------------------------------

/// Replays a recorded session: one CSV row per poll, one column per line
/// (pulse first), values `0`/`1`. Once the recording runs out every line
/// reads idle.
pub struct ReplaySampler {
    frames: Vec<Vec<bool>>,
    lines: usize,
    cursor: usize,
}

impl ReplaySampler {
    pub fn from_csv<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(File::open(path)?);

        let mut frames: Vec<Vec<bool>> = Vec::new();
        for result in rdr.records() {
            let record =
                result.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
            let frame: Vec<bool> = record
                .iter()
                .map(|field| field.trim() == "1")
                .collect();
            frames.push(frame);
        }

        let lines = match frames.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "replay file contains no line states",
                ))
            }
        };
        if frames.iter().any(|f| f.len() != lines) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "replay rows differ in line count",
            ));
        }

        Ok(Self {
            frames,
            lines,
            cursor: 0,
        })
    }

}

impl LineSampler for ReplaySampler {
    fn lines(&self) -> usize {
        self.lines
    }

    fn sample(&mut self) -> io::Result<Vec<bool>> {
        match self.frames.get(self.cursor) {
            Some(frame) => {
                self.cursor += 1;
                Ok(frame.clone())
            }
            None => Ok(vec![false; self.lines]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "scanner-synch-replay-{}-{}.csv",
            std::process::id(),
            contents.len()
        ));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn replays_rows_then_goes_idle() {
        let path = write_temp_csv("1,0,0\n0,1,0\n");
        let mut sampler = ReplaySampler::from_csv(&path).unwrap();
        assert_eq!(sampler.lines(), 3);
        assert_eq!(sampler.sample().unwrap(), vec![true, false, false]);
        assert_eq!(sampler.sample().unwrap(), vec![false, true, false]);
        assert_eq!(sampler.sample().unwrap(), vec![false, false, false]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn rejects_ragged_rows() {
        let path = write_temp_csv("1,0\n0,1,1\n");
        assert!(ReplaySampler::from_csv(&path).is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn rejects_empty_recording() {
        let path = write_temp_csv("");
        assert!(ReplaySampler::from_csv(&path).is_err());
        std::fs::remove_file(path).ok();
    }
}
