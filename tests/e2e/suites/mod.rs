mod classification;
mod output;
