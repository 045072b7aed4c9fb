pub mod courier_loader;
