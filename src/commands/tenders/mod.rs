pub mod award_tender_command;
pub mod create_tender_command;
pub mod publish_tender_command;
pub mod score_bid_command;
pub mod submit_bid_command;

pub use award_tender_command::{AwardTenderCommand, AwardTenderResult};
pub use create_tender_command::CreateTenderCommand;
pub use publish_tender_command::PublishTenderCommand;
pub use score_bid_command::ScoreBidCommand;
pub use submit_bid_command::SubmitBidCommand;
