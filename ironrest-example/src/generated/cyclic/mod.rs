// DO NOT EDIT
//
// Code automatically generated by ironrest
// Source files:

pub mod api;
