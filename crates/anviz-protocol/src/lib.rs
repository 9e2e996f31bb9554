pub mod checksum;
pub mod codec;
pub mod commands;
pub mod frame;
pub mod interpret;
pub mod message;
pub mod record;

pub use checksum::{ChecksumOutcome, ChecksumPolicy, xor_checksum};
pub use codec::AnvizCodec;
pub use commands::CommandCode;
pub use frame::{Frame, encode_ack};
pub use interpret::{AttendanceStatus, Interpretation, VerificationMode, interpret};
pub use message::Message;
pub use record::{VerifyRecord, decode_employee_id};
