mod token;
pub use token::{JobName, Partition};

mod tasks;
pub use tasks::TasksPerNode;

mod template;
pub use template::OutputTemplate;

mod id;
pub use id::JobId;

mod descriptor;
pub use descriptor::JobDescriptor;
