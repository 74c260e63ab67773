pub mod coze;
