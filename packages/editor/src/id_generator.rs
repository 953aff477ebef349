use crate::document::Template;
use crc32fast::Hasher;

/// Generate a short, stable seed from a template id using CRC32
pub fn get_template_seed(template_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(template_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential block id generator scoped to one template
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Template seed (CRC32)
    count: u32,   // Sequential counter
}

impl IdGenerator {
    pub fn new(template_id: &str) -> Self {
        Self {
            seed: get_template_seed(template_id),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Next id not already used anywhere in `template`
    ///
    /// The counter never goes backwards, so an id freed by a delete is not
    /// handed out again during the same session.
    pub fn next_id(&mut self, template: &Template) -> String {
        loop {
            self.count += 1;
            let id = format!("block-{}-{}", self.seed, self.count);
            if !template.contains_block_id(&id) {
                return id;
            }
        }
    }

    /// Template seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}
