mod gateway;
mod helpers;
mod report_scenarios;
