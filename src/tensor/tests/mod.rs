mod ops;
mod pad;
