mod assessment;

pub use assessment::AssessmentCommands;
